//! Test utilities for setting up source roots and target projects.
//!
//! This module provides a `TestFixture` builder for creating an isolated
//! tooling source root next to an empty target project.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    catalog::{Catalog, SKILL_FILE_NAME},
    diagnostics::Diagnostics,
    kind::ItemKind,
    manifest::MANIFEST_FILE_NAME,
    paths::CLAUDE_DIR,
    settings::store::settings_path,
};

/// Test fixture for creating isolated install environments.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    _root: TempDir,
    /// Tooling source root.
    source_dir: PathBuf,
    /// Target project root.
    target_dir: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with empty source and target directories.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let source_dir = root.path().join("tooling");
        fs::create_dir_all(&source_dir).expect("create source dir");
        let target_dir = root.path().join("project");
        fs::create_dir_all(&target_dir).expect("create target dir");

        Self {
            _root: root,
            source_dir,
            target_dir,
        }
    }

    /// Write a file relative to the source root.
    pub fn with_source_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.source_dir.join(relative), contents);
        self
    }

    /// Write a file relative to the target project root.
    pub fn with_target_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.target_dir.join(relative), contents);
        self
    }

    /// Add an agent definition.
    pub fn with_agent(self, name: &str, contents: &str) -> Self {
        let relative = format!("{}/{name}.md", ItemKind::Agents.dir_name());
        self.with_source_file(&relative, contents)
    }

    /// Add a command definition.
    pub fn with_command(self, name: &str, contents: &str) -> Self {
        let relative = format!("{}/{name}.md", ItemKind::Commands.dir_name());
        self.with_source_file(&relative, contents)
    }

    /// Add a skill directory with its skill file.
    pub fn with_skill(self, name: &str, contents: &str) -> Self {
        let relative = format!("{}/{name}/{SKILL_FILE_NAME}", ItemKind::Skills.dir_name());
        self.with_source_file(&relative, contents)
    }

    /// Write the hook manifest.
    pub fn with_manifest(self, contents: &str) -> Self {
        let relative = format!("{}/{MANIFEST_FILE_NAME}", ItemKind::Hooks.dir_name());
        self.with_source_file(&relative, contents)
    }

    /// Get the source root path.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Get the target project path.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Load a catalog from the source root.
    pub fn catalog(&self) -> Catalog {
        Catalog::load(&self.source_dir, &mut Diagnostics::new(false)).expect("load catalog")
    }

    /// Read a file relative to the target's `.claude` directory.
    pub fn installed(&self, relative: &str) -> Option<String> {
        fs::read_to_string(self.target_dir.join(CLAUDE_DIR).join(relative)).ok()
    }

    /// Path of the target's settings file.
    pub fn settings_path(&self) -> PathBuf {
        settings_path(&self.target_dir)
    }

    /// Read the target's settings file.
    pub fn read_settings(&self) -> Option<String> {
        fs::read_to_string(self.settings_path()).ok()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a file, creating parent directories.
fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_empty_fixture() {
        let fixture = TestFixture::new();
        assert!(fixture.source_dir().exists());
        assert!(fixture.target_dir().exists());
        assert!(fixture.read_settings().is_none());
    }

    #[test]
    fn adds_source_items() {
        let fixture = TestFixture::new()
            .with_agent("reader", "Reader\n")
            .with_skill("caching", "---\nname: caching\n---\n");

        assert!(fixture.source_dir().join("agents/reader.md").is_file());
        assert!(fixture.source_dir().join("skills/caching/SKILL.md").is_file());
    }
}
