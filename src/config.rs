//! Driver defaults.
//!
//! Loaded from an optional TOML file, then from `SPEX__`-prefixed environment
//! variables (`SPEX__SEQUENCE__LIMIT=100`, `SPEX__STREAM__READ_SIZE=4096`).
//! Every field has a default, so an empty source is a valid configuration.

use std::path::Path;

use config::{Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sequence: SequenceDefaults,
    pub page: PageDefaults,
    pub stream: StreamDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SequenceDefaults {
    /// `0` means no limit.
    pub limit: usize,
    pub track: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageDefaults {
    pub limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamDefaults {
    pub closable: bool,
    /// `0` reads whole chunks.
    pub read_size: usize,
}

impl Config {
    /// Load from `path` (if any) and the environment. Environment variables win.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let config: Config = builder
            .add_source(Environment::with_prefix("SPEX").prefix_separator("__").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }
}
