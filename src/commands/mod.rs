//! CLI command implementations.

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};

use crate::{config::Config, error::Result, paths};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Resolve the source root from `--source`, falling back to the config file.
///
/// Runs `init` first when no config exists yet.
pub(crate) async fn resolve_source(source: Option<PathBuf>) -> Result<PathBuf> {
    if source.is_some() {
        return paths::resolve_cli_path(source);
    }
    init::ensure().await?;
    let config = Config::load()?;
    Ok(config.source().to_path_buf())
}

// Command modules are ordered alphabetically - maintain this order.
/// Init command implementation.
pub mod init;
/// Install command implementation.
pub mod install;
/// List command implementation.
pub mod list;
