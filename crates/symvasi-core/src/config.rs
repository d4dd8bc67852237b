//! Configuration management for symvasi code generation.
//!
//! This module defines the `Config` struct holding runtime settings: where
//! targets live, which directory glob patterns and outputs are resolved
//! against, how much work runs concurrently, and global option/extension
//! defaults. The configuration can be loaded from a YAML file or created
//! programmatically.
//!
//! # Examples
//!
//! ```no_run
//! use symvasi_core::config::Config;
//!
//! let mut config = Config::new();
//! config.targets_dir = Some("targets".into());
//! config.concurrency = 4;
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::targets::TargetsDir;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tokio::fs;

/// Runtime configuration for symvasi builds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding one sub-directory per target
    #[serde(default)]
    pub targets_dir: Option<PathBuf>,

    /// Base directory for glob patterns and build outputs
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Maximum number of concurrent units of work per stage
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Options applied to every build, below the build's own options
    #[serde(default)]
    pub options: Map<String, JsonValue>,

    /// Extensions applied to every build, below the build's own extensions
    #[serde(default)]
    pub extensions: Map<String, JsonValue>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self {
            targets_dir: None,
            working_dir: None,
            concurrency: default_concurrency(),
            options: Map::new(),
            extensions: Map::new(),
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Resolve the targets root directory
    pub fn targets(&self) -> crate::Result<TargetsDir> {
        Ok(TargetsDir::discover(self.targets_dir.as_deref())?)
    }

    /// Base directory for relative patterns and outputs, falling back to
    /// `default` when none is configured
    pub fn working_dir_or(&self, default: &Path) -> PathBuf {
        self.working_dir
            .clone()
            .unwrap_or_else(|| default.to_path_buf())
    }
}

fn default_concurrency() -> usize {
    16
}
