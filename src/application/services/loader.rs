//! Resource loading
//!
//! Reads the tree document and the recommendation records. Both are needed
//! before anything else can happen, so they are loaded side by side and a
//! failure of either one aborts the load.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{RecommendationRecord, TreeDocument};
use crate::infrastructure::traits::FileSystem;

/// Both source documents, parsed.
#[derive(Debug, Clone)]
pub struct Resources {
    pub document: TreeDocument,
    pub records: Vec<RecommendationRecord>,
}

/// Loads the two JSON resources.
pub struct ResourceLoader {
    fs: Arc<dyn FileSystem>,
}

impl ResourceLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load both documents concurrently; either failure is fatal.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, tree: &Path, recommendations: &Path) -> ApplicationResult<Resources> {
        let (document, records) = rayon::join(
            || self.load_json::<TreeDocument>("decision tree", tree),
            || self.load_json::<Vec<RecommendationRecord>>("recommendations", recommendations),
        );
        let resources = Resources {
            document: document?,
            records: records?,
        };
        debug!("load: {} recommendation records", resources.records.len());
        Ok(resources)
    }

    fn load_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &Path,
    ) -> ApplicationResult<T> {
        let content =
            self.fs
                .read_to_string(path)
                .map_err(|e| ApplicationError::MissingResource {
                    resource,
                    path: path.to_path_buf(),
                    source: e,
                })?;
        // Trees nest arbitrarily deep, past serde_json's default limit of 128
        let mut deserializer = serde_json::Deserializer::from_str(&content);
        deserializer.disable_recursion_limit();
        T::deserialize(&mut deserializer)
            .and_then(|value| deserializer.end().map(|()| value))
            .map_err(|e| ApplicationError::InvalidResource {
                resource,
                path: path.to_path_buf(),
                source: e,
            })
    }
}
