//! Tree builder: turns a raw tree document into an arena with stable ids.

use tracing::debug;

use crate::domain::arena::{DecisionTree, NodeData};
use crate::domain::{NodeId, TreeDocument};

/// Constructs a `DecisionTree` from a document, stamping ids in pre-order.
///
/// Ids start at 0 and follow depth-first pre-order: a node before its
/// children, children in document order. Re-running the builder on the same
/// document yields the same ids.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    next_id: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree. Every node starts expanded; a missing or empty
    /// `children` field makes the node a leaf.
    pub fn build(mut self, document: &TreeDocument) -> DecisionTree {
        let mut tree = DecisionTree::new();
        let mut stack = vec![(document, None)];

        while let Some((current, parent_idx)) = stack.pop() {
            let id = NodeId(self.next_id);
            self.next_id += 1;

            let node_data = NodeData {
                name: current.name.clone(),
                kind: current.kind,
                url: current.url.clone(),
                recommendations: current.recommendations.clone(),
            };
            let current_idx = tree.insert_node(id, node_data, parent_idx);

            // Reverse push so the first child is popped (and numbered) first
            if let Some(children) = &current.children {
                for child in children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        debug!("build: assigned {} ids", self.next_id);
        tree
    }
}
