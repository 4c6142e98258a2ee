//! Random walk generation.
//!
//! A [`Walk`] is lazy: nothing is sampled until the caller pulls the next node, and
//! every step draws from the caller's RNG. Dropping a walk early needs no cleanup.

use crate::graph::{GraphRef, NodeId};
use crate::node2vec::{fill_biased_weights, BiasParameters};
use crate::record::WalkRecord;
use crate::{Error, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::iter::FusedIterator;

/// Transition model used to pick the next node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Transition {
    /// First-order, uniform over the current node's neighbors. Edge weights are ignored.
    #[default]
    Uniform,
    /// First-order, proportional to edge weight.
    Weighted,
    /// Second-order node2vec bias. The first step has no previous node and is uniform.
    Biased(BiasParameters),
}

impl Transition {
    pub fn validate(&self) -> Result<()> {
        match self {
            Transition::Biased(bias) => bias.validate(),
            Transition::Uniform | Transition::Weighted => Ok(()),
        }
    }
}

/// Position of one walker: where it is and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WalkState {
    pub(crate) current: NodeId,
    pub(crate) previous: Option<NodeId>,
}

impl WalkState {
    pub(crate) fn new(start: NodeId) -> Self {
        Self { current: start, previous: None }
    }

    /// Take one step. `buf` is scratch space for biased weights.
    pub(crate) fn advance<G: GraphRef + ?Sized, R: Rng>(
        &mut self,
        graph: &G,
        transition: Transition,
        rng: &mut R,
        buf: &mut Vec<f64>,
    ) -> Result<NodeId> {
        let cur = self.current;
        let (nbrs, wts) = graph.neighbors_and_weights(cur);
        if nbrs.is_empty() {
            tracing::debug!(node = cur, "walk reached a dead end");
            return Err(Error::DeadEnd { node: cur });
        }

        let next = match (transition, self.previous) {
            (Transition::Uniform, _) | (Transition::Biased(_), None) => sample_uniform(rng, nbrs),
            (Transition::Weighted, _) => sample_cdf(rng, nbrs, wts),
            (Transition::Biased(bias), Some(prev)) => {
                fill_biased_weights(graph, prev, nbrs, wts, bias, buf);
                sample_cdf(rng, nbrs, buf)
            }
        };

        tracing::trace!(from = cur, to = next, "walk step");
        self.previous = Some(cur);
        self.current = next;
        Ok(next)
    }
}

pub(crate) fn check_start<G: GraphRef + ?Sized>(graph: &G, start: NodeId) -> Result<()> {
    if graph.contains_node(start) {
        Ok(())
    } else {
        Err(Error::InvalidStartNode { node: start, node_count: graph.node_count() })
    }
}

/// A lazy random walk of `length` steps.
///
/// Yields the start node, then one node per step: `length + 1` items unless a
/// [`Error::DeadEnd`] cuts it short, in which case the error is the last item.
pub struct Walk<'a, G: ?Sized, R> {
    graph: &'a G,
    rng: &'a mut R,
    transition: Transition,
    state: WalkState,
    remaining: usize,
    started: bool,
    done: bool,
    buf: Vec<f64>,
}

impl<'a, G: GraphRef + ?Sized, R: Rng> Walk<'a, G, R> {
    pub fn new(
        graph: &'a G,
        start: NodeId,
        length: usize,
        transition: Transition,
        rng: &'a mut R,
    ) -> Result<Self> {
        check_start(graph, start)?;
        transition.validate()?;
        tracing::debug!(start, length, ?transition, "starting walk");

        Ok(Self {
            graph,
            rng,
            transition,
            state: WalkState::new(start),
            remaining: length,
            started: false,
            done: false,
            buf: Vec::new(),
        })
    }

    /// The most recently visited node (the start node before the first item).
    pub fn current(&self) -> NodeId {
        self.state.current
    }

    pub fn previous(&self) -> Option<NodeId> {
        self.state.previous
    }

    pub fn remaining_steps(&self) -> usize {
        if self.done {
            0
        } else {
            self.remaining
        }
    }

    /// Drain the walk into a [`WalkRecord`].
    pub fn record(self) -> Result<WalkRecord> {
        self.collect::<Result<Vec<_>>>().map(WalkRecord::from)
    }
}

impl<G: GraphRef + ?Sized, R: Rng> Iterator for Walk<'_, G, R> {
    type Item = Result<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.done = self.remaining == 0;
            return Some(Ok(self.state.current));
        }

        match self.state.advance(self.graph, self.transition, &mut *self.rng, &mut self.buf) {
            Ok(next) => {
                self.remaining -= 1;
                self.done = self.remaining == 0;
                Some(Ok(next))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = if self.done {
            0
        } else {
            self.remaining + usize::from(!self.started)
        };
        (usize::from(upper > 0), Some(upper))
    }
}

impl<G: GraphRef + ?Sized, R: Rng> FusedIterator for Walk<'_, G, R> {}

/// Uniform first-order walk.
pub fn start_walk<'a, G: GraphRef + ?Sized, R: Rng>(
    graph: &'a G,
    start: NodeId,
    length: usize,
    rng: &'a mut R,
) -> Result<Walk<'a, G, R>> {
    Walk::new(graph, start, length, Transition::Uniform, rng)
}

/// First-order walk proportional to edge weight.
pub fn start_weighted_walk<'a, G: GraphRef + ?Sized, R: Rng>(
    graph: &'a G,
    start: NodeId,
    length: usize,
    rng: &'a mut R,
) -> Result<Walk<'a, G, R>> {
    Walk::new(graph, start, length, Transition::Weighted, rng)
}

/// Second-order node2vec walk.
pub fn start_biased_walk<'a, G: GraphRef + ?Sized, R: Rng>(
    graph: &'a G,
    start: NodeId,
    length: usize,
    bias: BiasParameters,
    rng: &'a mut R,
) -> Result<Walk<'a, G, R>> {
    Walk::new(graph, start, length, Transition::Biased(bias), rng)
}

/// The exact distribution a walk samples from when standing on `current`.
///
/// Returns `(neighbor, probability)` in neighbor order.
pub fn transition_probabilities<G: GraphRef + ?Sized>(
    graph: &G,
    current: NodeId,
    previous: Option<NodeId>,
    transition: Transition,
) -> Result<Vec<(NodeId, f64)>> {
    if !graph.contains_node(current) {
        return Err(Error::NodeOutOfRange { node: current, node_count: graph.node_count() });
    }
    transition.validate()?;

    let (nbrs, wts) = graph.neighbors_and_weights(current);
    if nbrs.is_empty() {
        return Err(Error::DeadEnd { node: current });
    }

    let weights = match (transition, previous) {
        (Transition::Uniform, _) | (Transition::Biased(_), None) => vec![1.0; nbrs.len()],
        (Transition::Weighted, _) => wts.to_vec(),
        (Transition::Biased(bias), Some(prev)) => {
            let mut buf = Vec::with_capacity(nbrs.len());
            fill_biased_weights(graph, prev, nbrs, wts, bias, &mut buf);
            buf
        }
    };

    let max = max_weight(&weights);
    if max <= 0.0 {
        let uniform = 1.0 / nbrs.len() as f64;
        return Ok(nbrs.iter().map(|&v| (v, uniform)).collect());
    }
    let total = weights.iter().map(|&w| scaled(w, max)).sum::<f64>();
    Ok(nbrs
        .iter()
        .zip(weights)
        .map(|(&v, w)| (v, scaled(w, max) / total))
        .collect())
}

fn max_weight(weights: &[f64]) -> f64 {
    weights.iter().copied().fold(0.0, f64::max)
}

// Weights divided by their maximum, so summing them cannot overflow. When the product
// `alpha * w` itself overflowed, the infinite candidates share the mass equally.
fn scaled(w: f64, max: f64) -> f64 {
    if max.is_infinite() {
        if w.is_infinite() {
            1.0
        } else {
            0.0
        }
    } else {
        w / max
    }
}

fn sample_uniform<R: Rng>(rng: &mut R, nbrs: &[NodeId]) -> NodeId {
    nbrs[rng.random_range(0..nbrs.len())]
}

// One categorical draw. An all-zero neighborhood degrades to a uniform draw.
fn sample_cdf<R: Rng>(rng: &mut R, nbrs: &[NodeId], weights: &[f64]) -> NodeId {
    debug_assert_eq!(nbrs.len(), weights.len());
    let max = max_weight(weights);
    if max <= 0.0 {
        return sample_uniform(rng, nbrs);
    }

    let total = weights.iter().map(|&w| scaled(w, max)).sum::<f64>();
    let mut r = rng.random::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        let w = scaled(w, max);
        if r < w {
            return nbrs[i];
        }
        r -= w;
    }
    // rounding can leave `r` just past the last bucket
    let last = weights
        .iter()
        .rposition(|&w| scaled(w, max) > 0.0)
        .unwrap_or(nbrs.len() - 1);
    nbrs[last]
}

/// Parameters for generating a walk corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WalkConfig {
    /// Steps per walk; each walk has `length + 1` nodes.
    pub length: usize,
    pub walks_per_node: usize,
    pub transition: Transition,
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { length: 24, walks_per_node: 1, transition: Transition::Uniform, seed: 0 }
    }
}

/// `walks_per_node` walks from every node, in node order.
#[tracing::instrument(level = "debug", skip(graph))]
pub fn generate_walks<G: GraphRef + ?Sized>(graph: &G, config: WalkConfig) -> Result<Vec<Vec<NodeId>>> {
    let start_nodes: Vec<NodeId> = (0..graph.node_count()).collect();
    generate_walks_from_nodes(graph, &start_nodes, config)
}

/// Walks restricted to an explicit set of start nodes.
///
/// One `ChaCha8Rng` seeded from `config.seed` drives every walk. Each start node gets
/// all of its walks before the next start node begins. The first error aborts the batch.
#[tracing::instrument(level = "debug", skip(graph, start_nodes), fields(starts = start_nodes.len()))]
pub fn generate_walks_from_nodes<G: GraphRef + ?Sized>(
    graph: &G,
    start_nodes: &[NodeId],
    config: WalkConfig,
) -> Result<Vec<Vec<NodeId>>> {
    let mut walks = Vec::with_capacity(start_nodes.len().saturating_mul(config.walks_per_node));
    for_each_walk(graph, start_nodes, config, |w| walks.push(w.to_vec()))?;
    tracing::debug!(walks = walks.len(), "generated walks");
    Ok(walks)
}

/// Streaming variant of [`generate_walks_from_nodes`]: same walks, same order, but each
/// walk is lent to `f` from one reused buffer instead of being collected.
#[tracing::instrument(level = "debug", skip(graph, start_nodes, f), fields(starts = start_nodes.len()))]
pub fn for_each_walk<G, F>(
    graph: &G,
    start_nodes: &[NodeId],
    config: WalkConfig,
    mut f: F,
) -> Result<()>
where
    G: GraphRef + ?Sized,
    F: FnMut(&[NodeId]),
{
    config.transition.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut nodes: Vec<NodeId> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for &start in start_nodes {
        check_start(graph, start)?;
        for _ in 0..config.walks_per_node {
            nodes.clear();
            nodes.push(start);
            let mut state = WalkState::new(start);
            for _ in 0..config.length {
                nodes.push(state.advance(graph, config.transition, &mut rng, &mut weights)?);
            }
            f(&nodes);
        }
    }
    Ok(())
}

/// Deterministic parallel walks.
///
/// Invariant: output is stable for a fixed `seed`, independent of Rayon thread count.
/// Each walk gets its own RNG derived from `(seed, walk index)`, so the walks differ from
/// the serial [`generate_walks_from_nodes`] stream.
#[cfg(feature = "parallel")]
pub fn generate_walks_parallel_from_nodes<G: GraphRef + Sync + ?Sized>(
    graph: &G,
    start_nodes: &[NodeId],
    config: WalkConfig,
) -> Result<Vec<Vec<NodeId>>> {
    use rayon::prelude::*;

    config.transition.validate()?;
    let jobs: Vec<(usize, NodeId)> = start_nodes
        .iter()
        .flat_map(|&node| std::iter::repeat(node).take(config.walks_per_node))
        .enumerate()
        .collect();

    jobs.par_iter()
        .map(|&(i, node)| {
            let mut rng = ChaCha8Rng::seed_from_u64(mix64(config.seed ^ mix64(i as u64)));
            let walk = Walk::new(graph, node, config.length, config.transition, &mut rng)?;
            walk.collect::<Result<Vec<_>>>()
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}
