//! Graph adapter trait and the concrete undirected graph walks run on.

use crate::{Error, Result};

/// Nodes are dense indices `0..node_count`.
pub type NodeId = usize;

/// A graph view that returns **borrowed** neighbor + weight slices.
///
/// Walks only ever look at one node's neighborhood at a time, so this is all the
/// simulator needs. Borrowing keeps each step allocation-free.
pub trait GraphRef {
    fn node_count(&self) -> usize;

    /// Return `(neighbors, weights)` for a node.
    ///
    /// Requirements:
    /// - `neighbors.len() == weights.len()`
    /// - weights are finite and non-negative
    /// - an unknown node reports two empty slices
    fn neighbors_and_weights(&self, node: NodeId) -> (&[NodeId], &[f64]);

    fn contains_node(&self, node: NodeId) -> bool {
        node < self.node_count()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.neighbors_and_weights(node).0
    }

    fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Adjacency membership test. Implementors with sorted neighbor lists should
    /// override this with a binary search.
    fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }
}

/// Undirected, optionally weighted graph stored as sorted adjacency lists.
///
/// Neighbor `i` of node `u` is `adj[u][i]` and its edge weight is `wts[u][i]`; both
/// directions of an edge are stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adj: Vec<Vec<NodeId>>,
    wts: Vec<Vec<f64>>,
    edge_count: usize,
}

impl Graph {
    /// A graph with `node_count` isolated nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            adj: vec![Vec::new(); node_count],
            wts: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut g = Self::new(node_count);
        for (u, v) in edges {
            g.add_edge(u, v)?;
        }
        Ok(g)
    }

    pub fn from_weighted_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let mut g = Self::new(node_count);
        for (u, v, w) in edges {
            g.add_weighted_edge(u, v, w)?;
        }
        Ok(g)
    }

    pub fn add_node(&mut self) -> NodeId {
        self.adj.push(Vec::new());
        self.wts.push(Vec::new());
        self.adj.len() - 1
    }

    /// Add an unweighted edge (weight `1.0`).
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.add_weighted_edge(u, v, 1.0)
    }

    /// Add an undirected edge. Re-adding an existing edge replaces its weight.
    pub fn add_weighted_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        let node_count = self.adj.len();
        for node in [u, v] {
            if node >= node_count {
                return Err(Error::NodeOutOfRange { node, node_count });
            }
        }
        if u == v {
            return Err(Error::SelfLoop { node: u });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight { u, v, weight });
        }

        let inserted = self.insert_half(u, v, weight);
        self.insert_half(v, u, weight);
        if inserted {
            self.edge_count += 1;
        }
        Ok(())
    }

    // Returns true when the half-edge was new.
    fn insert_half(&mut self, from: NodeId, to: NodeId, weight: f64) -> bool {
        match self.adj[from].binary_search(&to) {
            Ok(i) => {
                self.wts[from][i] = weight;
                false
            }
            Err(i) => {
                self.adj[from].insert(i, to);
                self.wts[from].insert(i, weight);
                true
            }
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        let nbrs = self.adj.get(u)?;
        nbrs.binary_search(&v).ok().map(|i| self.wts[u][i])
    }

    /// Every undirected edge once, as `(u, v, weight)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.adj.iter().enumerate().flat_map(move |(u, nbrs)| {
            nbrs.iter()
                .zip(&self.wts[u])
                .filter(move |&(&v, _)| u < v)
                .map(move |(&v, &w)| (u, v, w))
        })
    }
}

impl GraphRef for Graph {
    fn node_count(&self) -> usize {
        self.adj.len()
    }

    fn neighbors_and_weights(&self, node: NodeId) -> (&[NodeId], &[f64]) {
        let nbrs = self.adj.get(node).map(Vec::as_slice).unwrap_or(&[]);
        let wts = self.wts.get(node).map(Vec::as_slice).unwrap_or(&[]);
        (nbrs, wts)
    }

    fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }
}

#[cfg(feature = "petgraph")]
impl<N, E, Ix> TryFrom<&petgraph::graph::UnGraph<N, E, Ix>> for Graph
where
    E: Clone + Into<f64>,
    Ix: petgraph::graph::IndexType,
{
    type Error = Error;

    fn try_from(graph: &petgraph::graph::UnGraph<N, E, Ix>) -> Result<Self> {
        use petgraph::visit::EdgeRef;

        let mut g = Graph::new(graph.node_count());
        for e in graph.edge_references() {
            g.add_weighted_edge(e.source().index(), e.target().index(), e.weight().clone().into())?;
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_stay_sorted_with_aligned_weights() {
        let g = Graph::from_weighted_edges(4, [(1, 3, 3.0), (1, 0, 0.5), (2, 1, 2.0)]).unwrap();
        let (nbrs, wts) = g.neighbors_and_weights(1);
        assert_eq!(nbrs, &[0, 2, 3]);
        assert_eq!(wts, &[0.5, 2.0, 3.0]);
        assert_eq!(g.neighbors(3), &[1]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn re_adding_an_edge_replaces_its_weight() {
        let mut g = Graph::from_edges(2, [(0, 1)]).unwrap();
        g.add_weighted_edge(1, 0, 4.0).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(0, 1), Some(4.0));
        assert_eq!(g.edge_weight(1, 0), Some(4.0));
        assert_eq!(g.degree(0), 1);
    }

    #[test]
    fn rejects_bad_edges() {
        let mut g = Graph::new(3);
        assert_eq!(g.add_edge(1, 1), Err(Error::SelfLoop { node: 1 }));
        assert_eq!(
            g.add_edge(0, 7),
            Err(Error::NodeOutOfRange { node: 7, node_count: 3 })
        );
        assert!(matches!(
            g.add_weighted_edge(0, 1, -1.0),
            Err(Error::InvalidWeight { u: 0, v: 1, .. })
        ));
        assert!(g.add_weighted_edge(0, 1, f64::NAN).is_err());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn unknown_nodes_have_no_neighbors() {
        let g = Graph::new(2);
        assert!(!g.contains_node(2));
        assert!(g.neighbors(9).is_empty());
        assert_eq!(g.edge_weight(9, 0), None);
    }

    #[test]
    fn edges_lists_each_edge_once() {
        let mut g = Graph::from_edges(3, [(2, 0), (0, 1)]).unwrap();
        let n = g.add_node();
        g.add_weighted_edge(n, 1, 0.25).unwrap();
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(0, 1, 1.0), (0, 2, 1.0), (1, 3, 0.25)]);
        assert!(g.is_adjacent(3, 1));
        assert!(!g.is_adjacent(3, 0));
    }
}
