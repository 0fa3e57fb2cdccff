//! Configuration, matching `reunion.toml`.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. The config file (`--config`, else `./reunion.toml` if present)
//! 3. Command-line flags and `REUNION_*` environment variables

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReunionError, ReunionResult};
use crate::model::RootPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "reunion.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReunionConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub tree: TreeSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub path: PathBuf,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".data").join("reunion.db"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSection {
    #[serde(default)]
    pub root_policy: RootPolicy,
}

impl ReunionConfig {
    /// Loads `path` if given (it must exist), else `./reunion.toml` if it
    /// exists, else the defaults.
    pub fn load(path: Option<&Path>) -> ReunionResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> ReunionResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReunionError::Other(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&text)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> ReunionResult<Self> {
        Ok(toml::from_str(text)?)
    }
}
