//! Implementation of the `claudekit init` command.

use std::{
    fs,
    path::{Path, PathBuf},
};

use inquire::{Confirm, Text, error::InquireError};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    paths::{default_config_path, display_path, expand_path},
};

/// Execute the init command.
pub async fn run() -> Result<()> {
    init(InitMode::Explicit).await
}

/// Ensure a config exists, running init if needed.
pub async fn ensure() -> Result<()> {
    init(InitMode::Auto).await
}

/// Mode for init execution.
#[derive(Debug, Clone, Copy)]
enum InitMode {
    /// Run init because the user requested it.
    Explicit,
    /// Run init automatically when config is missing.
    Auto,
}

/// Serialized config payload for init.
#[derive(Debug, Serialize)]
struct InitConfig {
    /// Tooling source directory.
    source: String,
}

/// Run init for the requested mode.
async fn init(mode: InitMode) -> Result<()> {
    let config_path = default_config_path()?;
    if config_path.is_file() {
        if matches!(mode, InitMode::Explicit) {
            println!("Config already exists at {}", display_path(&config_path));
        }
        return Ok(());
    }

    if matches!(mode, InitMode::Auto) {
        println!("No config found. Starting `claudekit init`...");
    }

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let source = prompt_source(config_dir)?;
    write_config(&config_path, &source)?;

    println!("Created config at {}", display_path(&config_path));
    Ok(())
}

/// Ask for the tooling directory, offering to create it when missing.
fn prompt_source(config_dir: &Path) -> Result<PathBuf> {
    let default_label = display_path(&default_source_dir()?);
    let response = Text::new("Tooling source directory")
        .with_default(&default_label)
        .with_help_message("Directory containing agents/, commands/, hooks/ and skills/")
        .prompt()
        .map_err(prompt_error)?;

    let trimmed = response.trim();
    let raw = if trimmed.is_empty() {
        default_label.as_str()
    } else {
        trimmed
    };

    let source = expand_path(raw, config_dir)?;
    if source.is_dir() {
        return Ok(source);
    }

    let create = Confirm::new(&format!("Create directory {}?", display_path(&source)))
        .with_default(true)
        .prompt()
        .map_err(prompt_error)?;
    if !create {
        return Err(Error::PathMissing { path: source });
    }
    fs::create_dir_all(&source).map_err(|error| Error::CreateDir {
        path: source.clone(),
        source: error,
    })?;
    Ok(source)
}

/// Write a config file pointing at a source root.
fn write_config(config_path: &Path, source: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|error| Error::ConfigWrite {
            path: parent.to_path_buf(),
            source: error,
        })?;
    }

    let config = InitConfig {
        source: source.to_string_lossy().to_string(),
    };
    let contents =
        toml::to_string(&config).map_err(|error| Error::ConfigSerialize { source: error })?;

    fs::write(config_path, contents).map_err(|error| Error::ConfigWrite {
        path: config_path.to_path_buf(),
        source: error,
    })
}

/// Map prompt failures onto CLI errors.
fn prompt_error(error: InquireError) -> Error {
    match error {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            Error::PromptCanceled
        }
        error => Error::PromptFailed {
            message: error.to_string(),
        },
    }
}

/// Build a default source directory suggestion.
fn default_source_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::HomeDirMissing)?;
    Ok(home.join("claude-tooling"))
}
