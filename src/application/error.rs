//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot load {resource} from {path}")]
    MissingResource {
        resource: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {resource} document {path}")]
    InvalidResource {
        resource: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage failed: {context}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot navigate to {url}")]
    Navigation {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
