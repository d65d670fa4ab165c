//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Domain errors represent violations of the tree engine's rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node id: {0}")]
    UnknownNode(NodeId),

    #[error("node is not visible: {0}")]
    NodeNotVisible(NodeId),
}
