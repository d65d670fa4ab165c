//! Outbound navigation: leaving the guide for a terminal node's destination.

use std::io;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use tracing::debug;

use crate::infrastructure::traits::CommandRunner;

/// Navigation capability.
pub trait Navigator: Send + Sync {
    /// Leave for `url`.
    fn navigate(&self, url: &str) -> io::Result<()>;
}

/// Opens destinations with an external opener command (browser, xdg-open, ...).
pub struct CommandNavigator {
    cmd: Arc<dyn CommandRunner>,
    opener: String,
}

impl CommandNavigator {
    pub fn new(cmd: Arc<dyn CommandRunner>, opener: impl Into<String>) -> Self {
        Self {
            cmd,
            opener: opener.into(),
        }
    }
}

impl Navigator for CommandNavigator {
    fn navigate(&self, url: &str) -> io::Result<()> {
        debug!("navigate: {} {}", self.opener, url);
        let output = self.cmd.run(&self.opener, &[url])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exited with status: {}", self.opener, output.status),
            ))
        }
    }
}

/// Prints the destination instead of opening it.
#[derive(Debug, Default)]
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, url: &str) -> io::Result<()> {
        println!("{} {}", "→".green(), url);
        Ok(())
    }
}

/// Remembers destinations, for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> io::Result<()> {
        self.visited
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "navigator lock poisoned"))?
            .push(url.to_string());
        Ok(())
    }
}
