//! Domain layer: entities and the tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod interaction;
pub mod render;
pub mod resolver;
pub mod visibility;

pub use arena::{ChildSlot, DecisionTree, NodeData, TreeNode};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::DomainError;
pub use interaction::{classify, ClickAction, Mode};
pub use render::{RenderFrame, RenderLink, RenderNode};
pub use resolver::resolve;
pub use visibility::InitPolicy;
