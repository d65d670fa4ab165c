use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::{DomainError, NodeId, NodeKind, RecommendationId, TraversalPath};

/// Data payload for tree nodes, taken from the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Display label
    pub name: String,
    /// Styling class
    pub kind: NodeKind,
    /// Outbound link, if any
    pub url: Option<String>,
    /// Recommendation ids, meaningful on terminal nodes only
    pub recommendations: Option<Vec<RecommendationId>>,
}

impl NodeData {
    /// Returns the node's real destination, if it has one.
    ///
    /// Empty urls and the placeholder url do not count as destinations.
    pub fn destination(&self, placeholder: &str) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != placeholder)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Child slot of a node: either no children at all, or children that are
/// currently shown, or children that are hidden but remembered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildSlot {
    Leaf,
    Visible(Vec<Index>),
    Collapsed(Vec<Index>),
}

impl ChildSlot {
    /// All children, regardless of visibility.
    pub fn all(&self) -> &[Index] {
        match self {
            ChildSlot::Leaf => &[],
            ChildSlot::Visible(children) | ChildSlot::Collapsed(children) => children,
        }
    }

    /// Children currently shown.
    pub fn visible(&self) -> &[Index] {
        match self {
            ChildSlot::Visible(children) => children,
            ChildSlot::Leaf | ChildSlot::Collapsed(_) => &[],
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, ChildSlot::Visible(_))
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, ChildSlot::Collapsed(_))
    }

    pub fn has_children(&self) -> bool {
        !matches!(self, ChildSlot::Leaf)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Pre-order id assigned at load time
    pub id: NodeId,
    /// Document data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Children and their visibility
    pub children: ChildSlot,
}

/// Arena-based decision tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Parent links are back-references for ancestry walks; ownership of children
/// is expressed only through `ChildSlot`.
#[derive(Debug)]
pub struct DecisionTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    /// Lookup from node id to arena index, covering hidden nodes as well
    ids: HashMap<NodeId, Index>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            ids: HashMap::new(),
        }
    }

    /// Inserts a node below `parent` (appended after existing siblings).
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, id: NodeId, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            id,
            data,
            parent,
            children: ChildSlot::Leaf,
        };
        let node_idx = self.arena.insert(node);
        self.ids.insert(id, node_idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                match &mut parent.children {
                    ChildSlot::Leaf => parent.children = ChildSlot::Visible(vec![node_idx]),
                    ChildSlot::Visible(children) | ChildSlot::Collapsed(children) => {
                        children.push(node_idx)
                    }
                }
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Finds a node by id in the full hierarchy, hidden nodes included.
    pub fn index_of(&self, id: NodeId) -> Option<Index> {
        self.ids.get(&id).copied()
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.get_node(idx))
    }

    /// Pre-order iteration over every node, ignoring collapse state.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, false)
    }

    /// Pre-order iteration over the currently visible nodes.
    pub fn iter_visible(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, true)
    }

    /// Ancestor chain from the root down to `idx`, inclusive.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut chain = Vec::new();
        let mut current = Some(idx);
        while let Some(current_idx) = current {
            match self.get_node(current_idx) {
                Some(node) => {
                    chain.push(current_idx);
                    current = node.parent;
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// Root-to-node id sequence for the node with `id`.
    pub fn path_to(&self, id: NodeId) -> Result<TraversalPath, DomainError> {
        let idx = self.index_of(id).ok_or(DomainError::UnknownNode(id))?;
        let ids = self
            .ancestors(idx)
            .into_iter()
            .filter_map(|ancestor| self.get_node(ancestor).map(|n| n.id))
            .collect();
        Ok(TraversalPath::new(ids))
    }

    /// A node is visible when every ancestor above it is expanded.
    pub fn is_visible(&self, idx: Index) -> bool {
        let chain = self.ancestors(idx);
        chain
            .iter()
            .take(chain.len().saturating_sub(1))
            .all(|&ancestor| {
                self.get_node(ancestor)
                    .is_some_and(|node| node.children.is_expanded())
            })
            && !chain.is_empty()
    }
}

/// Pre-order iterator yielding `(index, node, depth)`.
pub struct TreeIterator<'a> {
    tree: &'a DecisionTree,
    stack: Vec<(Index, usize)>,
    visible_only: bool,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DecisionTree, visible_only: bool) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, 0));
        }
        Self {
            tree,
            stack,
            visible_only,
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                let children = if self.visible_only {
                    node.children.visible()
                } else {
                    node.children.all()
                };
                // Push children in reverse order for left-to-right traversal
                for &child in children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str) -> NodeData {
        NodeData {
            name: name.to_string(),
            kind: NodeKind::Decision,
            url: None,
            recommendations: None,
        }
    }

    #[test]
    fn given_inserted_children_when_iterating_then_yields_preorder_with_depth() {
        let mut tree = DecisionTree::new();
        let root = tree.insert_node(NodeId(0), data("root"), None);
        let a = tree.insert_node(NodeId(1), data("a"), Some(root));
        tree.insert_node(NodeId(2), data("a1"), Some(a));
        tree.insert_node(NodeId(3), data("b"), Some(root));

        let visited: Vec<(String, usize)> = tree
            .iter()
            .map(|(_, node, depth)| (node.data.name.clone(), depth))
            .collect();
        assert_eq!(
            visited,
            vec![
                ("root".to_string(), 0),
                ("a".to_string(), 1),
                ("a1".to_string(), 2),
                ("b".to_string(), 1)
            ]
        );
    }

    #[test]
    fn given_leaf_when_adding_first_child_then_slot_becomes_visible() {
        let mut tree = DecisionTree::new();
        let root = tree.insert_node(NodeId(0), data("root"), None);
        assert_eq!(tree.get_node(root).unwrap().children, ChildSlot::Leaf);

        let child = tree.insert_node(NodeId(1), data("child"), Some(root));
        assert_eq!(
            tree.get_node(root).unwrap().children,
            ChildSlot::Visible(vec![child])
        );
    }

    #[test]
    fn given_nested_node_when_computing_path_then_returns_root_to_node_ids() {
        let mut tree = DecisionTree::new();
        let root = tree.insert_node(NodeId(0), data("root"), None);
        let a = tree.insert_node(NodeId(1), data("a"), Some(root));
        tree.insert_node(NodeId(2), data("a1"), Some(a));

        let path = tree.path_to(NodeId(2)).unwrap();
        assert_eq!(path.ids(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(
            tree.path_to(NodeId(9)),
            Err(DomainError::UnknownNode(NodeId(9)))
        );
    }

    #[test]
    fn given_placeholder_or_blank_url_when_asking_destination_then_returns_none() {
        let mut node = data("x");
        assert_eq!(node.destination("#"), None);
        node.url = Some("#".into());
        assert_eq!(node.destination("#"), None);
        node.url = Some("  ".into());
        assert_eq!(node.destination("#"), None);
        node.url = Some("page.html".into());
        assert_eq!(node.destination("#"), Some("page.html"));
    }
}
