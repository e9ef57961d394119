//! `inliner.toml` configuration

use inliner_core::ExpandOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "inliner.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InlinerConfig {
    /// Library roots, consulted after any `-I` directories
    pub search_paths: Vec<PathBuf>,

    #[serde(flatten)]
    pub expand: ExpandOptions,
}

impl InlinerConfig {
    /// Load a config file; relative search paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.search_paths = config
            .search_paths
            .into_iter()
            .map(|p| if p.is_relative() { base.join(p) } else { p })
            .collect();

        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// `inliner.toml` in `dir`, if present
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::from_file(&candidate).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Explicit file if given, otherwise discovery in `cwd`, otherwise defaults
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Ok(Self::discover(cwd)?.unwrap_or_default()),
        }
    }
}
