//! Collapse state store: expand/collapse/toggle on the arena, plus the two
//! initial visibility policies.

use std::mem;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{ChildSlot, DecisionTree};
use crate::domain::PathMembershipSet;

/// Initial visibility for a freshly loaded tree.
#[derive(Debug, Clone, Copy)]
pub enum InitPolicy<'a> {
    /// Root stays open, every first-level branch is collapsed.
    CollapseBelowRoot,
    /// Everything collapsed, then the recorded path opened top-down.
    ExpandAlongPath(&'a PathMembershipSet),
}

impl DecisionTree {
    /// Hide the node's children and collapse the whole subtree below it.
    /// No-op when already collapsed or a leaf.
    #[instrument(level = "trace", skip(self))]
    pub fn collapse(&mut self, idx: Index) {
        let mut pending = vec![idx];
        while let Some(current) = pending.pop() {
            let Some(node) = self.get_node_mut(current) else {
                continue;
            };
            if let ChildSlot::Visible(children) = &mut node.children {
                let children = mem::take(children);
                pending.extend(children.iter().copied());
                node.children = ChildSlot::Collapsed(children);
            }
        }
    }

    /// Show the node's remembered children. No-op when already expanded or a leaf.
    #[instrument(level = "trace", skip(self))]
    pub fn expand(&mut self, idx: Index) {
        if let Some(node) = self.get_node_mut(idx) {
            if let ChildSlot::Collapsed(children) = &mut node.children {
                let children = mem::take(children);
                node.children = ChildSlot::Visible(children);
            }
        }
    }

    /// Expand if collapsed, collapse if expanded. Returns whether the node
    /// is expanded afterwards.
    pub fn toggle(&mut self, idx: Index) -> bool {
        let Some(node) = self.get_node(idx) else {
            return false;
        };
        let id = node.id;
        if node.children.is_expanded() {
            self.collapse(idx);
        } else if node.children.is_collapsed() {
            self.expand(idx);
        } else {
            trace!("toggle: {} is a leaf", id);
        }
        let expanded = self
            .get_node(idx)
            .is_some_and(|node| node.children.is_expanded());
        debug!("toggle: node {} expanded={}", id, expanded);
        expanded
    }

    /// Collapse every node of the tree.
    pub fn collapse_all(&mut self) {
        if let Some(root) = self.root() {
            self.collapse(root);
        }
    }

    /// Expand path members top-down, descending only into expanded nodes.
    /// Assumes the tree was collapsed uniformly beforehand.
    fn expand_along(&mut self, root: Index, members: &PathMembershipSet) {
        let mut pending = vec![root];
        while let Some(idx) = pending.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            if members.contains(node.id) {
                self.expand(idx);
            }
            if let Some(node) = self.get_node(idx) {
                pending.extend(node.children.visible().iter().copied());
            }
        }
    }

    /// Apply an initial visibility policy.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_policy(&mut self, policy: InitPolicy<'_>) {
        let Some(root) = self.root() else {
            return;
        };
        match policy {
            InitPolicy::CollapseBelowRoot => {
                let first_level = self
                    .get_node(root)
                    .map(|node| node.children.all().to_vec())
                    .unwrap_or_default();
                self.expand(root);
                for child in first_level {
                    self.collapse(child);
                }
            }
            InitPolicy::ExpandAlongPath(members) => {
                self.collapse_all();
                self.expand_along(root, members);
            }
        }
    }
}
