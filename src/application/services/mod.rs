//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, KeyValueStore, Navigator)
//! but are themselves concrete structs, not traits.

mod controller;
mod loader;
mod recorder;
mod replayer;
mod session;

pub use controller::{ClickOutcome, InteractionController};
pub use loader::{ResourceLoader, Resources};
pub use recorder::PathRecorder;
pub use replayer::{PathReplayer, ReplayedPath};
pub use session::{GuideService, Session};
