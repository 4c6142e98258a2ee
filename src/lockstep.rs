//! Several walkers advancing together on one RNG.
//!
//! Every tick moves each walker once, in input order, so the draw order is
//! walker 0, walker 1, ..., walker n-1, then the next tick.

use crate::graph::{GraphRef, NodeId};
use crate::random_walk::{check_start, Transition, WalkState};
use crate::record::WalkRecord;
use crate::Result;
use rand::Rng;
use std::iter::FusedIterator;

/// Yields the start positions, then the positions of all walkers after each tick.
///
/// The first dead end ends the whole group.
pub struct LockstepWalks<'a, G: ?Sized, R> {
    graph: &'a G,
    rng: &'a mut R,
    transition: Transition,
    states: Vec<WalkState>,
    remaining: usize,
    started: bool,
    done: bool,
    buf: Vec<f64>,
}

pub fn start_lockstep_walks<'a, G: GraphRef + ?Sized, R: Rng>(
    graph: &'a G,
    starts: &[NodeId],
    length: usize,
    transition: Transition,
    rng: &'a mut R,
) -> Result<LockstepWalks<'a, G, R>> {
    for &start in starts {
        check_start(graph, start)?;
    }
    transition.validate()?;
    tracing::debug!(walkers = starts.len(), length, ?transition, "starting lockstep walks");

    Ok(LockstepWalks {
        graph,
        rng,
        transition,
        states: starts.iter().copied().map(WalkState::new).collect(),
        remaining: length,
        started: false,
        done: false,
        buf: Vec::new(),
    })
}

impl<G: GraphRef + ?Sized, R: Rng> LockstepWalks<'_, G, R> {
    pub fn walkers(&self) -> usize {
        self.states.len()
    }

    fn positions(&self) -> Vec<NodeId> {
        self.states.iter().map(|s| s.current).collect()
    }

    /// Drain the group into one record per walker, in input order.
    pub fn records(self) -> Result<Vec<WalkRecord>> {
        let mut walks: Vec<Vec<NodeId>> = vec![Vec::new(); self.walkers()];
        for positions in self {
            for (walk, node) in walks.iter_mut().zip(positions?) {
                walk.push(node);
            }
        }
        Ok(walks.into_iter().map(WalkRecord::from).collect())
    }
}

impl<G: GraphRef + ?Sized, R: Rng> Iterator for LockstepWalks<'_, G, R> {
    type Item = Result<Vec<NodeId>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.done = self.remaining == 0;
            return Some(Ok(self.positions()));
        }

        for state in &mut self.states {
            if let Err(e) = state.advance(self.graph, self.transition, &mut *self.rng, &mut self.buf) {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.remaining -= 1;
        self.done = self.remaining == 0;
        Some(Ok(self.positions()))
    }
}

impl<G: GraphRef + ?Sized, R: Rng> FusedIterator for LockstepWalks<'_, G, R> {}
