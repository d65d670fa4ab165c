//! Render frame handed to the drawing collaborator after every update.
//!
//! The frame is purely logical: visible nodes in pre-order with their depth
//! and row, visible parent/child links, and highlight flags. Pixel layout is
//! the collaborator's business.

use serde::Serialize;

use crate::domain::arena::DecisionTree;
use crate::domain::{Mode, NodeId, NodeKind, PathMembershipSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    /// Pre-order rank among visible nodes
    pub row: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub terminal: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLink {
    pub source: NodeId,
    pub target: NodeId,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderFrame {
    /// Node the view should center on, if the update was caused by a click
    pub focus: Option<NodeId>,
    pub nodes: Vec<RenderNode>,
    pub links: Vec<RenderLink>,
}

impl RenderFrame {
    /// Snapshot the visible part of `tree`.
    ///
    /// Highlighting only happens on the replay page: nodes in `members`, and
    /// links whose both ends are in `members`.
    pub fn capture(
        tree: &DecisionTree,
        mode: Mode,
        members: &PathMembershipSet,
        placeholder: &str,
        focus: Option<NodeId>,
    ) -> Self {
        let highlight = |id: NodeId| mode == Mode::Replay && members.contains(id);
        let mut frame = RenderFrame {
            focus,
            ..Default::default()
        };

        for (row, (_, node, depth)) in tree.iter_visible().enumerate() {
            frame.nodes.push(RenderNode {
                id: node.id,
                name: node.data.name.clone(),
                kind: node.data.kind,
                depth,
                row,
                expandable: node.children.has_children(),
                expanded: node.children.is_expanded(),
                terminal: node.data.destination(placeholder).is_some(),
                highlighted: highlight(node.id),
            });
            if let Some(parent) = node.parent.and_then(|p| tree.get_node(p)) {
                frame.links.push(RenderLink {
                    source: parent.id,
                    target: node.id,
                    highlighted: highlight(parent.id) && highlight(node.id),
                });
            }
        }
        frame
    }

    pub fn node(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn highlighted_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.highlighted)
            .map(|n| n.id)
            .collect()
    }
}
