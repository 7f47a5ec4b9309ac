#![warn(missing_docs)]
//! Library support for the claudekit CLI.

/// Catalog of installable items in a source root.
mod catalog;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and validation.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Unified diff rendering helpers.
mod diff;
/// Error handling for the crate.
mod error;
/// YAML frontmatter parsing for item definitions.
mod frontmatter;
/// Copying selected items into a target project.
mod install;
/// Item kinds and their directories.
mod kind;
/// Hook manifest and profiles.
mod manifest;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Settings documents and the merge engine.
pub mod settings;
/// Test fixtures for source roots and target projects.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, Result};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
