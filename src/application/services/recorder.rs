//! Path recorder: persists the root-to-terminal path, then navigates away.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DecisionTree, NodeId, TraversalPath};
use crate::infrastructure::navigator::Navigator;
use crate::infrastructure::store::KeyValueStore;

/// Writes traversal paths to the shared store. Sole writer of the path key.
pub struct PathRecorder {
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    key: String,
}

impl PathRecorder {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            key: key.into(),
        }
    }

    /// Record the path to `terminal` and leave for `url`.
    ///
    /// The path overwrites whatever was stored before. Navigation only starts
    /// after the write returned, so a failed write never navigates.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn record(
        &self,
        tree: &DecisionTree,
        terminal: NodeId,
        url: &str,
    ) -> ApplicationResult<TraversalPath> {
        let path = tree.path_to(terminal)?;
        let json = serde_json::to_string(&path).map_err(|e| ApplicationError::OperationFailed {
            context: format!("serialize path {path}"),
            source: Box::new(e),
        })?;
        self.store
            .set(&self.key, &json)
            .with_key_context("write path", &self.key)?;
        info!("record: stored path {} under {}", path, self.key);

        self.navigator
            .navigate(url)
            .map_err(|e| ApplicationError::Navigation {
                url: url.to_string(),
                source: e,
            })?;
        Ok(path)
    }

    /// Drop any stored path.
    pub fn clear(&self) -> ApplicationResult<()> {
        self.store
            .clear(&self.key)
            .with_key_context("clear path", &self.key)
    }
}
