//! Path replayer: reads the stored path back on the replay page.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{NodeId, PathMembershipSet, TraversalPath};
use crate::infrastructure::store::KeyValueStore;

/// A path read back from storage, with its membership set.
#[derive(Debug, Clone, Default)]
pub struct ReplayedPath {
    pub path: TraversalPath,
    pub members: PathMembershipSet,
}

impl ReplayedPath {
    pub fn new(path: TraversalPath) -> Self {
        let members = path.membership();
        Self { path, members }
    }

    /// Node the traversal ended on; None when nothing was recorded.
    pub fn terminal(&self) -> Option<NodeId> {
        self.path.terminal()
    }
}

/// Reads traversal paths from the shared store. Sole reader of the path key.
pub struct PathReplayer {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PathReplayer {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Read the stored path, strictly: storage and parse errors are reported.
    pub fn stored(&self) -> ApplicationResult<Option<TraversalPath>> {
        let Some(raw) = self
            .store
            .get(&self.key)
            .with_key_context("read path", &self.key)?
        else {
            return Ok(None);
        };
        let path = serde_json::from_str(&raw).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse stored path {:?}", raw),
            source: Box::new(e),
        })?;
        Ok(Some(path))
    }

    /// Read the stored path for replay. A missing or unreadable path is a
    /// normal state (direct visit, stale data) and replays as empty.
    pub fn replay(&self) -> ReplayedPath {
        match self.stored() {
            Ok(Some(path)) => {
                debug!("replay: path {}", path);
                ReplayedPath::new(path)
            }
            Ok(None) => {
                debug!("replay: no path recorded under {}", self.key);
                ReplayedPath::default()
            }
            Err(e) => {
                warn!("replay: ignoring stored path: {}", e);
                ReplayedPath::default()
            }
        }
    }
}
