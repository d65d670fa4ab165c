//! Interaction controller: applies one click to the tree.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::PathRecorder;
use crate::application::ApplicationResult;
use crate::domain::{classify, ClickAction, DecisionTree, DomainError, Mode, NodeId, TraversalPath};

/// Result of a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Subtree toggled; the view should re-center on `node`.
    Toggled { node: NodeId, expanded: bool },
    /// Path recorded and navigation to `url` started; the page is done.
    Navigated { url: String, path: TraversalPath },
}

/// Click state machine for one page.
pub struct InteractionController {
    mode: Mode,
    placeholder: String,
    recorder: Arc<PathRecorder>,
}

impl InteractionController {
    pub fn new(mode: Mode, placeholder: impl Into<String>, recorder: Arc<PathRecorder>) -> Self {
        Self {
            mode,
            placeholder: placeholder.into(),
            recorder,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Handle a click on the visible node `id`.
    ///
    /// Repeated clicks are safe: toggles simply alternate.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn click(&self, tree: &mut DecisionTree, id: NodeId) -> ApplicationResult<ClickOutcome> {
        let idx = tree.index_of(id).ok_or(DomainError::UnknownNode(id))?;
        if !tree.is_visible(idx) {
            return Err(DomainError::NodeNotVisible(id).into());
        }
        let node = tree.get_node(idx).ok_or(DomainError::UnknownNode(id))?;

        match classify(self.mode, node, &self.placeholder) {
            ClickAction::Terminate { url } => {
                let path = self.recorder.record(tree, id, &url)?;
                Ok(ClickOutcome::Navigated { url, path })
            }
            ClickAction::Toggle => {
                let expanded = tree.toggle(idx);
                debug!("click: {} mode={} expanded={}", id, self.mode, expanded);
                Ok(ClickOutcome::Toggled { node: id, expanded })
            }
        }
    }
}
