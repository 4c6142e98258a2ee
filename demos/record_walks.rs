//! Recorded walks on the 10-node sample graph.
//!
//! Prints what a renderer would animate: one walker from node 1, then five walkers
//! moving in lockstep, then a node2vec walker, each with its truncated history trail.
//!
//! Run with `RUST_LOG=graphwalk=debug` to see walk lifecycle events.

use graphwalk::{
    start_biased_walk, start_lockstep_walks, start_walk, transition_probabilities,
    BiasParameters, Graph, HistoryConfig, Transition, WalkConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn main() -> graphwalk::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let graph = Graph::from_edges(
        10,
        [
            (0, 1),
            (1, 2),
            (1, 3),
            (2, 3),
            (3, 4),
            (4, 5),
            (4, 6),
            (2, 7),
            (7, 8),
            (8, 9),
        ],
    )?;
    let config = WalkConfig::default();
    let history = HistoryConfig::default();

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let single = start_walk(&graph, 1, config.length, &mut rng)?.record()?;
    println!("single walker: {}", single.history(history));

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let starts = [1, 5, 6, 7, 9];
    let group = start_lockstep_walks(&graph, &starts, config.length, Transition::Uniform, &mut rng)?;
    for record in group.records()? {
        println!("lockstep walker: {}", record.history(history));
    }

    let bias = BiasParameters::new(0.5, 2.0)?;
    for (v, p) in transition_probabilities(&graph, 3, Some(2), Transition::Biased(bias))? {
        println!("P(3 -> {v} | came from 2) = {p:.3}");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let biased = start_biased_walk(&graph, 1, config.length, bias, &mut rng)?.record()?;
    println!("node2vec walker: {}", biased.history(history));

    Ok(())
}
