//! Configuration loading and validation.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    paths,
};

/// Parsed configuration for the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tooling repository that items are installed from.
    source: PathBuf,
}

/// Raw config file structure.
#[derive(Debug, Deserialize)]
struct RawConfig {
    /// Tooling repository path, possibly relative or with `~`.
    source: Option<String>,
}

impl Config {
    /// Build a config for an explicit source root.
    pub(crate) fn new(source: PathBuf) -> Self {
        Self { source }
    }

    /// Load the default config from disk.
    pub(crate) fn load() -> Result<Self> {
        let path = paths::default_config_path()?;
        Self::load_from(&path)
    }

    /// Load a config file from an explicit path.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(Error::NoSource {
                    config_path: path.to_path_buf(),
                });
            }
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let raw: RawConfig = toml::from_str(&contents).map_err(|error| Error::ConfigParse {
            path: path.to_path_buf(),
            source: error,
        })?;

        let Some(raw_source) = raw.source.filter(|source| !source.trim().is_empty()) else {
            return Err(Error::NoSource {
                config_path: path.to_path_buf(),
            });
        };

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let source = paths::expand_path(raw_source.trim(), base_dir)?;
        Ok(Self::new(source))
    }

    /// Return the configured source root.
    pub(crate) fn source(&self) -> &Path {
        &self.source
    }
}
