//! Click state machine: what a click on a node means on a given page.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::arena::TreeNode;

/// Which page the engine is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Walk the questionnaire; terminal clicks record the path and navigate.
    Entry,
    /// Explore a recorded path; every click only toggles.
    Replay,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Entry => write!(f, "entry"),
            Mode::Replay => write!(f, "replay"),
        }
    }
}

/// Decision taken for a single click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Flip the node's subtree and re-center on it
    Toggle,
    /// Record the path and leave for `url`
    Terminate { url: String },
}

/// Decide what clicking `node` does, in precedence order:
/// replay page always toggles; otherwise a real destination terminates;
/// everything else toggles.
pub fn classify(mode: Mode, node: &TreeNode, placeholder: &str) -> ClickAction {
    if mode == Mode::Replay {
        return ClickAction::Toggle;
    }
    match node.data.destination(placeholder) {
        Some(url) => ClickAction::Terminate {
            url: url.to_string(),
        },
        None => ClickAction::Toggle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::{ChildSlot, NodeData};
    use crate::domain::{NodeId, NodeKind};
    use rstest::rstest;

    fn node(url: Option<&str>, children: ChildSlot) -> TreeNode {
        TreeNode {
            id: NodeId(7),
            data: NodeData {
                name: "n".into(),
                kind: NodeKind::Outcome,
                url: url.map(String::from),
                recommendations: None,
            },
            parent: None,
            children,
        }
    }

    #[rstest]
    #[case(Mode::Entry, Some("next.html"), ClickAction::Terminate { url: "next.html".into() })]
    #[case(Mode::Entry, Some("#"), ClickAction::Toggle)]
    #[case(Mode::Entry, Some(""), ClickAction::Toggle)]
    #[case(Mode::Entry, None, ClickAction::Toggle)]
    #[case(Mode::Replay, Some("next.html"), ClickAction::Toggle)]
    #[case(Mode::Replay, None, ClickAction::Toggle)]
    fn given_mode_and_url_when_classifying_then_returns_expected_action(
        #[case] mode: Mode,
        #[case] url: Option<&str>,
        #[case] expected: ClickAction,
    ) {
        assert_eq!(classify(mode, &node(url, ChildSlot::Leaf), "#"), expected);
    }

    #[test]
    fn given_url_on_node_with_children_when_classifying_then_still_terminates() {
        let n = node(Some("page.html"), ChildSlot::Collapsed(vec![]));
        assert_eq!(
            classify(Mode::Entry, &n, "#"),
            ClickAction::Terminate {
                url: "page.html".into()
            }
        );
    }
}
