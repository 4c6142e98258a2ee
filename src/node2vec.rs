//! Node2vec second-order bias.
//!
//! Given the previous node `x`, the current node `u` and a candidate `v` adjacent to `u`,
//! the unnormalized transition weight is `alpha(x, v) * w(u, v)` with
//!
//! - `alpha = 1/p` when `v == x` (return),
//! - `alpha = 1` when `v` is adjacent to `x` (local),
//! - `alpha = 1/q` otherwise (outward).
//!
//! Only these three distance classes matter, so classification is an adjacency
//! membership test against `x`, never a shortest-path search.

use crate::graph::{GraphRef, NodeId};
use crate::{Error, Result};

/// Return parameter `p` and in-out parameter `q`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiasParameters {
    pub p: f64,
    pub q: f64,
}

impl Default for BiasParameters {
    fn default() -> Self {
        Self { p: 1.0, q: 1.0 }
    }
}

impl BiasParameters {
    pub fn new(p: f64, q: f64) -> Result<Self> {
        let bias = Self { p, q };
        bias.validate()?;
        Ok(bias)
    }

    /// Both parameters are divisors, so they must be finite and strictly positive, and
    /// so must their reciprocals (subnormal values overflow `1 / value`).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("p", self.p), ("q", self.q)] {
            if !(value.is_finite() && value > 0.0 && (1.0 / value).is_finite()) {
                return Err(Error::InvalidBiasParameter { name, value });
            }
        }
        Ok(())
    }

    pub fn alpha<G: GraphRef + ?Sized>(&self, graph: &G, previous: NodeId, candidate: NodeId) -> f64 {
        match MoveKind::classify(graph, previous, candidate) {
            MoveKind::Return => 1.0 / self.p,
            MoveKind::Local => 1.0,
            MoveKind::Outward => 1.0 / self.q,
        }
    }
}

/// How a candidate move relates to the node the walker just left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Back to the previous node (distance 0).
    Return,
    /// To a neighbor of the previous node (distance 1).
    Local,
    /// Anywhere else (distance 2).
    Outward,
}

impl MoveKind {
    pub fn classify<G: GraphRef + ?Sized>(graph: &G, previous: NodeId, candidate: NodeId) -> Self {
        if candidate == previous {
            MoveKind::Return
        } else if graph.is_adjacent(previous, candidate) {
            MoveKind::Local
        } else {
            MoveKind::Outward
        }
    }
}

/// Fill `buf` with the unnormalized biased weight of every candidate in `nbrs`.
pub(crate) fn fill_biased_weights<G: GraphRef + ?Sized>(
    graph: &G,
    previous: NodeId,
    nbrs: &[NodeId],
    wts: &[f64],
    bias: BiasParameters,
    buf: &mut Vec<f64>,
) {
    debug_assert_eq!(nbrs.len(), wts.len());
    buf.clear();
    buf.extend(
        nbrs.iter()
            .zip(wts)
            .map(|(&v, &w)| bias.alpha(graph, previous, v) * w),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected |{a} - {b}| <= {eps}");
    }

    // 0 -- 1 -- 3
    //  \  |
    //   \ |
    //     2
    fn triangle_with_tail() -> Graph {
        Graph::from_edges(4, [(0, 1), (0, 2), (1, 2), (1, 3)]).unwrap()
    }

    #[test]
    fn classifies_the_three_move_kinds() {
        let g = triangle_with_tail();
        assert_eq!(MoveKind::classify(&g, 0, 0), MoveKind::Return);
        assert_eq!(MoveKind::classify(&g, 0, 2), MoveKind::Local);
        assert_eq!(MoveKind::classify(&g, 0, 3), MoveKind::Outward);
    }

    #[test]
    fn rejects_non_positive_or_non_finite_parameters() {
        assert_eq!(
            BiasParameters::new(0.0, 1.0),
            Err(Error::InvalidBiasParameter { name: "p", value: 0.0 })
        );
        assert_eq!(
            BiasParameters::new(1.0, -2.0),
            Err(Error::InvalidBiasParameter { name: "q", value: -2.0 })
        );
        assert!(BiasParameters::new(f64::INFINITY, 1.0).is_err());
        assert!(BiasParameters::new(1.0, f64::NAN).is_err());
        assert!(BiasParameters::new(0.25, 4.0).is_ok());

        // 1 / 1e-310 overflows to infinity.
        assert_eq!(
            BiasParameters::new(1e-310, 1.0),
            Err(Error::InvalidBiasParameter { name: "p", value: 1e-310 })
        );
        assert!(BiasParameters::new(1.0, 1e-310).is_err());
        assert!(BiasParameters::new(1e-300, 1e-300).is_ok());
    }

    #[test]
    fn biased_weights_scale_edge_weights_by_alpha() {
        let g = Graph::from_weighted_edges(
            4,
            [(0, 1, 1.0), (0, 2, 1.0), (1, 2, 3.0), (1, 3, 2.0)],
        )
        .unwrap();
        let bias = BiasParameters::new(0.5, 4.0).unwrap();

        // cur = 1, prev = 0: candidates [0, 2, 3] are return / local / outward.
        let (nbrs, wts) = g.neighbors_and_weights(1);
        let mut buf = Vec::new();
        fill_biased_weights(&g, 0, nbrs, wts, bias, &mut buf);

        assert_eq!(buf.len(), 3);
        assert_close(buf[0], 2.0, 1e-12);
        assert_close(buf[1], 3.0, 1e-12);
        assert_close(buf[2], 0.5, 1e-12);
    }

    #[test]
    fn unit_bias_leaves_weights_unchanged() {
        let g = triangle_with_tail();
        let (nbrs, wts) = g.neighbors_and_weights(1);
        let mut buf = vec![9.0; 8];
        fill_biased_weights(&g, 2, nbrs, wts, BiasParameters::default(), &mut buf);
        assert_eq!(buf, vec![1.0, 1.0, 1.0]);
    }
}
