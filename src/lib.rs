//! decision-guide: navigable decision trees.
//!
//! A questionnaire tree is walked node by node (branches expand and collapse,
//! terminal nodes record the traversed path and navigate on), and a recorded
//! path is replayed into a highlighted tree plus a filtered list of
//! recommendations.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
