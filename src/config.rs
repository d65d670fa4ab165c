//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/decision-guide/decision-guide.toml`
//! 3. Local config: `<data_dir>/.decision-guide.toml`
//! 4. Environment variables: `DGUIDE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

const APP_NAME: &str = "decision-guide";

/// Unified configuration for decision-guide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the tree and recommendation documents (default: cwd)
    pub data_dir: PathBuf,
    /// Tree document file name, relative to data_dir
    pub tree_file: String,
    /// Recommendation records file name, relative to data_dir
    pub recommendations_file: String,
    /// Directory for state surviving between runs (recorded path)
    pub state_dir: PathBuf,
    /// Storage key of the recorded path
    pub path_key: String,
    /// Url value meaning "no destination"
    pub placeholder_url: String,
    /// Command used to open destinations (default: $BROWSER or "xdg-open")
    pub opener: String,
}

impl Default for Settings {
    fn default() -> Self {
        let opener = std::env::var("BROWSER").unwrap_or_else(|_| "xdg-open".into());

        Self {
            data_dir: PathBuf::from("."),
            tree_file: "data.json".into(),
            recommendations_file: "recommendations.json".into(),
            state_dir: default_state_dir(),
            path_key: "decisionPath".into(),
            placeholder_url: "#".into(),
            opener,
        }
    }
}

/// Raw settings for intermediate parsing (all fields optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub tree_file: Option<String>,
    pub recommendations_file: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub path_key: Option<String>,
    pub placeholder_url: Option<String>,
    pub opener: Option<String>,
}

/// Default state directory: XDG data dir, falling back to ~/.decision-guide.
fn default_state_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .or_else(|| directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".decision-guide")))
        .unwrap_or_else(|| PathBuf::from("~/.decision-guide"))
}

/// Get the XDG config directory for decision-guide.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("decision-guide.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".decision-guide.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Full path of the tree document.
    pub fn tree_path(&self) -> PathBuf {
        self.data_dir.join(&self.tree_file)
    }

    /// Full path of the recommendation records document.
    pub fn recommendations_path(&self) -> PathBuf {
        self.data_dir.join(&self.recommendations_file)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = PathBuf::from(expand_env_vars(&self.data_dir.to_string_lossy()));
        self.state_dir = PathBuf::from(expand_env_vars(&self.state_dir.to_string_lossy()));
        self.opener = expand_env_vars(&self.opener);
    }

    /// Merge overlay config onto self: overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            tree_file: overlay
                .tree_file
                .clone()
                .unwrap_or_else(|| self.tree_file.clone()),
            recommendations_file: overlay
                .recommendations_file
                .clone()
                .unwrap_or_else(|| self.recommendations_file.clone()),
            state_dir: overlay
                .state_dir
                .clone()
                .unwrap_or_else(|| self.state_dir.clone()),
            path_key: overlay
                .path_key
                .clone()
                .unwrap_or_else(|| self.path_key.clone()),
            placeholder_url: overlay
                .placeholder_url
                .clone()
                .unwrap_or_else(|| self.placeholder_url.clone()),
            opener: overlay.opener.clone().unwrap_or_else(|| self.opener.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_dir` - Optional data directory (from the command line); also
    ///   where the local config is looked up
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/decision-guide/decision-guide.toml`
    /// 3. Local config: `<data_dir>/.decision-guide.toml`
    /// 4. Environment variables: `DGUIDE_*` prefix
    ///
    /// A `data_dir` given on the command line beats every layer.
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config, next to the documents
        let local_dir = data_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.data_dir.clone());
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        if let Some(dir) = data_dir {
            current.data_dir = dir.to_path_buf();
        }

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply DGUIDE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DGUIDE"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("tree_file") {
            settings.tree_file = val;
        }
        if let Ok(val) = config.get_string("recommendations_file") {
            settings.recommendations_file = val;
        }
        if let Ok(val) = config.get_string("state_dir") {
            settings.state_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("path_key") {
            settings.path_key = val;
        }
        if let Ok(val) = config.get_string("placeholder_url") {
            settings.placeholder_url = val;
        }
        if let Ok(val) = config.get_string("opener") {
            settings.opener = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# decision-guide configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/decision-guide/decision-guide.toml
#   Local:  <data_dir>/.decision-guide.toml
#   Env:    DGUIDE_* environment variables (e.g. DGUIDE_PATH_KEY)

# Directory holding the documents
# data_dir = "."

# Decision tree document
# tree_file = "data.json"

# Recommendation records document
# recommendations_file = "recommendations.json"

# Where the recorded path is kept between runs
# state_dir = "~/.local/share/decision-guide"

# Storage key of the recorded path
# path_key = "decisionPath"

# Url meaning "no destination": such nodes expand instead of navigating
# placeholder_url = "#"

# Command used to open destinations
# opener = "xdg-open"
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
