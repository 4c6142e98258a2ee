//! Visited-node records and the step-keyed history overlay.
//!
//! A renderer that draws a trail like `1 → 0 → 1 → 3 …` next to a walker asks
//! [`HistoryEntry::at`] what (if anything) to show at each step.

use crate::graph::NodeId;
use std::fmt;

/// The ordered nodes of one walk, start node included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct WalkRecord {
    nodes: Vec<NodeId>,
}

impl WalkRecord {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }

    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Number of moves (one less than the number of nodes).
    pub fn steps(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn transitions(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }

    /// How often each node `0..node_count` appears. Ids outside the range are ignored.
    pub fn visit_counts(&self, node_count: usize) -> Vec<usize> {
        let mut counts = vec![0; node_count];
        for &node in &self.nodes {
            if let Some(c) = counts.get_mut(node) {
                *c += 1;
            }
        }
        counts
    }

    pub fn history(&self, config: HistoryConfig) -> History<'_> {
        History { record: self, config }
    }
}

impl From<Vec<NodeId>> for WalkRecord {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<NodeId> for WalkRecord {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self { nodes: iter.into_iter().collect() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HistoryConfig {
    /// Steps spelled out before the trail collapses into an ellipsis.
    pub record_length: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { record_length: 8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    Start(NodeId),
    Step(NodeId),
    Ellipsis,
}

impl HistoryEntry {
    /// What the history shows for the node reached at `step` (0 is the start node).
    pub fn at(step: usize, node: NodeId, config: HistoryConfig) -> Option<Self> {
        if step == 0 {
            Some(HistoryEntry::Start(node))
        } else if step <= config.record_length {
            Some(HistoryEntry::Step(node))
        } else if step - 1 == config.record_length {
            Some(HistoryEntry::Ellipsis)
        } else {
            None
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryEntry::Start(node) => write!(f, "{node}"),
            HistoryEntry::Step(node) => write!(f, "→ {node}"),
            HistoryEntry::Ellipsis => f.write_str("…"),
        }
    }
}

/// Truncated textual trail of a walk.
#[derive(Debug, Clone, Copy)]
pub struct History<'a> {
    record: &'a WalkRecord,
    config: HistoryConfig,
}

impl History<'_> {
    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry> + '_ {
        let config = self.config;
        self.record
            .nodes
            .iter()
            .enumerate()
            .map_while(move |(step, &node)| HistoryEntry::at(step, node, config))
    }
}

impl fmt::Display for History<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_spells_out_then_collapses() {
        let config = HistoryConfig { record_length: 2 };
        assert_eq!(HistoryEntry::at(0, 7, config), Some(HistoryEntry::Start(7)));
        assert_eq!(HistoryEntry::at(1, 3, config), Some(HistoryEntry::Step(3)));
        assert_eq!(HistoryEntry::at(2, 4, config), Some(HistoryEntry::Step(4)));
        assert_eq!(HistoryEntry::at(3, 5, config), Some(HistoryEntry::Ellipsis));
        assert_eq!(HistoryEntry::at(4, 6, config), None);
    }

    #[test]
    fn history_renders_a_truncated_trail() {
        let record = WalkRecord::from(vec![1, 3, 2, 7, 8, 7]);
        assert_eq!(
            record.history(HistoryConfig { record_length: 3 }).to_string(),
            "1 → 3 → 2 → 7 …"
        );
        assert_eq!(
            record.history(HistoryConfig { record_length: 10 }).to_string(),
            "1 → 3 → 2 → 7 → 8 → 7"
        );
        assert_eq!(WalkRecord::default().history(HistoryConfig::default()).to_string(), "");
    }

    #[test]
    fn record_accessors() {
        let record: WalkRecord = [1, 0, 1, 2].into_iter().collect();
        assert_eq!(record.start(), Some(1));
        assert_eq!(record.last(), Some(2));
        assert_eq!(record.steps(), 3);
        assert_eq!(record.transitions().collect::<Vec<_>>(), vec![(1, 0), (0, 1), (1, 2)]);
        assert_eq!(record.visit_counts(3), vec![1, 2, 1]);
        assert_eq!(record.visit_counts(1), vec![1]);
        assert_eq!(WalkRecord::default().steps(), 0);
    }
}
