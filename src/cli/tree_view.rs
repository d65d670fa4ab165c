//! Terminal rendering of render frames
//!
//! The CLI is the drawing collaborator here: frames become termtree trees
//! for display and selection lists for interactive walking.

use std::collections::HashMap;

use colored::Colorize;
use termtree::Tree;

use crate::domain::{NodeId, NodeKind, RenderFrame, RenderNode};
use crate::infrastructure::traits::SelectionItem;

pub trait FrameConvert {
    fn to_tree_string(&self) -> Tree<String>;
    fn to_selection_items(&self) -> Vec<SelectionItem>;
}

fn marker(node: &RenderNode) -> &'static str {
    if node.terminal {
        "→"
    } else if node.expanded {
        "▾"
    } else if node.expandable {
        "▸"
    } else {
        "·"
    }
}

/// One-line label: marker, id, name.
pub fn node_label(node: &RenderNode) -> String {
    let text = format!("{} [{}] {}", marker(node), node.id, node.name);
    if node.highlighted {
        text.blue().bold().to_string()
    } else {
        match node.kind {
            NodeKind::Decision => text,
            NodeKind::Outcome => text.green().to_string(),
        }
    }
}

impl FrameConvert for RenderFrame {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root) = self.nodes.first() else {
            return Tree::new("Empty tree".to_string());
        };

        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for link in &self.links {
            children.entry(link.source).or_default().push(link.target);
        }

        fn build(
            frame: &RenderFrame,
            id: NodeId,
            children: &HashMap<NodeId, Vec<NodeId>>,
        ) -> Tree<String> {
            let label = frame.node(id).map(node_label).unwrap_or_default();
            let leaves: Vec<_> = children
                .get(&id)
                .map(|kids| kids.iter().map(|&kid| build(frame, kid, children)).collect())
                .unwrap_or_default();
            Tree::new(label).with_leaves(leaves)
        }

        build(self, root.id, &children)
    }

    fn to_selection_items(&self) -> Vec<SelectionItem> {
        self.nodes
            .iter()
            .map(|node| SelectionItem {
                display: format!(
                    "{}{} [{}] {}",
                    "  ".repeat(node.depth),
                    marker(node),
                    node.id,
                    node.name
                ),
                value: node.id.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InitPolicy, Mode, PathMembershipSet, TreeBuilder, TreeDocument};

    fn frame() -> RenderFrame {
        let mut tree = TreeBuilder::new().build(&TreeDocument::decision(
            "Start",
            vec![
                TreeDocument::decision("Cloud?", vec![TreeDocument::outcome("Yes", "y.html")]),
                TreeDocument::outcome("Skip", "s.html"),
            ],
        ));
        tree.apply_policy(InitPolicy::CollapseBelowRoot);
        RenderFrame::capture(&tree, Mode::Entry, &PathMembershipSet::default(), "#", None)
    }

    #[test]
    fn given_frame_when_converting_then_tree_contains_visible_labels_only() {
        colored::control::set_override(false);
        let rendered = frame().to_tree_string().to_string();
        assert!(rendered.contains("▾ [0] Start"));
        assert!(rendered.contains("▸ [1] Cloud?"));
        assert!(rendered.contains("→ [3] Skip"));
        assert!(!rendered.contains("Yes"));
    }

    #[test]
    fn given_frame_when_building_selection_then_values_are_node_ids() {
        let items = frame().to_selection_items();
        let values: Vec<&str> = items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["0", "1", "3"]);
        assert!(items[1].display.starts_with("  ▸ [1]"));
    }
}
