//! Error types for the claudekit CLI.

use std::{env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult};

use thiserror::Error;
use toml::{de::Error as TomlError, ser::Error as TomlSerError};

/// Result type for claudekit operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// No source root was given and none is configured.
    #[error("No source configured; pass --source or edit {config_path} to set `source`.")]
    NoSource {
        /// Path to the config file.
        config_path: PathBuf,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// The configuration file could not be serialized.
    #[error("Failed to serialize config: {source}")]
    ConfigSerialize {
        /// Underlying serialization error.
        source: TomlSerError,
    },
    /// The configuration file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// The current working directory could not be determined.
    #[error("Failed to resolve the current directory: {source}")]
    CurrentDir {
        /// Underlying IO error.
        source: io::Error,
    },
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// A path required for operation does not exist.
    #[error("Path does not exist: {path}")]
    PathMissing {
        /// Path that does not exist.
        path: PathBuf,
    },
    /// The source root is missing or not a directory.
    #[error("Source directory not found: {path}")]
    SourceMissing {
        /// Configured source root.
        path: PathBuf,
    },
    /// The hook manifest could not be read.
    #[error("Failed to read hook manifest at {path}: {source}")]
    ManifestRead {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The hook manifest is not valid JSON for the expected shape.
    #[error("Failed to parse hook manifest at {path}: {source}")]
    ManifestParse {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// A hook profile was requested that the manifest does not define.
    #[error("Unknown profile '{name}' (available: {available})")]
    UnknownProfile {
        /// Requested profile name.
        name: String,
        /// Comma-separated list of defined profiles.
        available: String,
    },
    /// A directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that failed to be created.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// An item could not be copied into the target.
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A previously installed item could not be removed before replacing it.
    #[error("Failed to remove {path}: {source}")]
    Remove {
        /// Path that failed to be removed.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A directory tree could not be traversed.
    #[error("Failed to walk {path}: {message}")]
    Walk {
        /// Root of the traversal.
        path: PathBuf,
        /// Error message from the walker.
        message: String,
    },
    /// File permissions could not be updated.
    #[error("Failed to set permissions on {path}: {source}")]
    SetPermissions {
        /// Path whose mode could not be changed.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The settings file could not be read.
    #[error("Failed to read settings at {path}: {source}")]
    SettingsRead {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The settings file exists but is not a valid settings document.
    #[error("Malformed settings at {path}: {source}")]
    SettingsParse {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// The merged settings could not be serialized.
    #[error("Failed to serialize settings: {source}")]
    SettingsSerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// The settings file could not be written.
    #[error("Failed to write settings at {path}: {source}")]
    SettingsWrite {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}
