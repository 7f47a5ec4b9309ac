//! Copying selected items into a target project.

use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    catalog::{Catalog, Item, Selection},
    diagnostics::Diagnostics,
    error::{Error, Result},
    kind::ItemKind,
    manifest::HookDefinition,
    settings::{
        SettingsDocument,
        fragment::{command_fragment, hook_fragment},
    },
};

/// Mode applied to installed shell hooks.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Outcome of installing one kind.
#[derive(Debug)]
pub struct InstallReport {
    /// Kind that was installed.
    pub(crate) kind: ItemKind,
    /// Directory the items were copied into.
    pub(crate) target_dir: PathBuf,
    /// Installed entries as displayed (skills end with `/`).
    pub(crate) installed: Vec<String>,
    /// Settings contributed by the installed items.
    pub(crate) fragment: SettingsDocument,
}

/// Installs items from a catalog into one target project.
#[derive(Debug)]
pub struct Installer<'a> {
    /// Catalog items are taken from.
    catalog: &'a Catalog,
    /// Target project root.
    target: PathBuf,
    /// When set, nothing is written.
    dry_run: bool,
}

impl<'a> Installer<'a> {
    /// Create an installer for a target project.
    pub(crate) fn new(catalog: &'a Catalog, target: &Path, dry_run: bool) -> Self {
        Self {
            catalog,
            target: target.to_path_buf(),
            dry_run,
        }
    }

    /// Install the selected items of one kind and return their fragment.
    pub(crate) fn install(
        &self,
        kind: ItemKind,
        selection: &Selection,
        diagnostics: &mut Diagnostics,
    ) -> Result<InstallReport> {
        let target_dir = kind.install_dir(&self.target);
        let (installed, fragment) = match kind {
            ItemKind::Hooks => {
                let hooks = self.catalog.select_hooks(selection, diagnostics)?;
                self.install_hooks(&hooks, &target_dir, diagnostics)?
            }
            ItemKind::Skills => {
                let items = self.catalog.select_items(kind, selection, diagnostics);
                let installed = self.install_skills(&items, &target_dir)?;
                (installed, SettingsDocument::new())
            }
            ItemKind::Agents | ItemKind::Commands => {
                let items = self.catalog.select_items(kind, selection, diagnostics);
                let installed = self.install_files(&items, &target_dir)?;
                let fragment = if kind == ItemKind::Commands {
                    let names = items.iter().map(|item| item.name.as_str()).collect::<Vec<_>>();
                    command_fragment(&names)
                } else {
                    SettingsDocument::new()
                };
                (installed, fragment)
            }
        };

        Ok(InstallReport {
            kind,
            target_dir,
            installed,
            fragment,
        })
    }

    /// Copy single-file items.
    fn install_files(&self, items: &[&Item], target_dir: &Path) -> Result<Vec<String>> {
        if !items.is_empty() {
            self.create_dir(target_dir)?;
        }
        let mut installed = Vec::new();
        for item in items {
            let Some(file_name) = item.path.file_name() else {
                continue;
            };
            self.copy_file(&item.path, &target_dir.join(file_name))?;
            installed.push(file_name.to_string_lossy().to_string());
        }
        Ok(installed)
    }

    /// Replace each skill directory with a fresh copy.
    fn install_skills(&self, items: &[&Item], target_dir: &Path) -> Result<Vec<String>> {
        if !items.is_empty() {
            self.create_dir(target_dir)?;
        }
        let mut installed = Vec::new();
        for item in items {
            let destination = target_dir.join(&item.name);
            if !self.dry_run {
                copy_tree(&item.path, &destination)?;
            }
            installed.push(format!("{}/", item.name));
        }
        Ok(installed)
    }

    /// Copy hook scripts and build the fragment wiring them.
    ///
    /// Hooks whose script is missing from the source are reported and left
    /// out of the fragment.
    fn install_hooks(
        &self,
        hooks: &[&HookDefinition],
        target_dir: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<(Vec<String>, SettingsDocument)> {
        if !hooks.is_empty() {
            self.create_dir(target_dir)?;
        }
        let source_dir = self.catalog.hooks_dir();
        let mut installed = Vec::new();
        let mut wired: Vec<&HookDefinition> = Vec::new();
        for hook in hooks {
            let source = source_dir.join(&hook.file);
            if !source.is_file() {
                diagnostics.warn_skipped(
                    hook.id.clone(),
                    format!("hook file not found: {}", source.display()),
                );
                continue;
            }
            let destination = target_dir.join(&hook.file);
            self.copy_file(&source, &destination)?;
            if hook.is_shell_script() && !self.dry_run {
                make_executable(&destination)?;
            }
            installed.push(hook.file.clone());
            wired.push(hook);
        }
        Ok((installed, hook_fragment(&wired)))
    }

    /// Create a directory unless running dry.
    fn create_dir(&self, dir: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|error| Error::CreateDir {
            path: dir.to_path_buf(),
            source: error,
        })
    }

    /// Copy one file unless running dry.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        fs::copy(from, to).map_err(|error| Error::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: error,
        })?;
        Ok(())
    }
}

/// Replace `to` with a recursive copy of `from`.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        fs::remove_dir_all(to).map_err(|error| Error::Remove {
            path: to.to_path_buf(),
            source: error,
        })?;
    }

    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.map_err(|error| Error::Walk {
            path: from.to_path_buf(),
            message: error.to_string(),
        })?;
        let relative = entry.path().strip_prefix(from).map_err(|_| Error::Walk {
            path: from.to_path_buf(),
            message: format!("{} is outside the skill directory", entry.path().display()),
        })?;
        let destination = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).map_err(|error| Error::CreateDir {
                path: destination.clone(),
                source: error,
            })?;
        } else {
            fs::copy(entry.path(), &destination).map_err(|error| Error::Copy {
                from: entry.path().to_path_buf(),
                to: destination.clone(),
                source: error,
            })?;
        }
    }
    Ok(())
}

/// Mark a file as executable.
#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE)).map_err(|error| {
        Error::SetPermissions {
            path: path.to_path_buf(),
            source: error,
        }
    })
}

/// Executable bits do not exist on this platform.
#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::Installer;
    use crate::{
        catalog::Selection, diagnostics::Diagnostics, kind::ItemKind, testutil::TestFixture,
    };

    const MANIFEST: &str = r#"{
        "hooks": [
            {"id": "guard", "name": "Guard", "file": "guard.py", "type": "PreToolUse", "matcher": "Bash"},
            {"id": "fmt", "name": "Format", "file": "fmt.sh", "type": "PostToolUse", "matcher": "Edit"},
            {"id": "ghost", "name": "Ghost", "file": "ghost.py", "type": "PreToolUse", "matcher": "Bash"}
        ],
        "profiles": {"shell": {"description": "Shell only", "hooks": ["fmt"]}}
    }"#;

    fn hook_fixture() -> TestFixture {
        TestFixture::new()
            .with_manifest(MANIFEST)
            .with_source_file("hooks/guard.py", "print('guard')\n")
            .with_source_file("hooks/fmt.sh", "echo fmt\n")
    }

    #[test]
    fn copies_agents_without_settings() {
        let fixture = TestFixture::new().with_agent("reader", "---\nname: reader\n---\n");
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), false);

        let report = installer
            .install(ItemKind::Agents, &Selection::All, &mut Diagnostics::new(false))
            .expect("install");
        assert_eq!(report.installed, vec!["reader.md"]);
        assert!(report.fragment.is_empty());
        assert!(fixture.installed("agents/reader.md").is_some());
    }

    #[test]
    fn commands_produce_skill_permissions() {
        let fixture = TestFixture::new()
            .with_command("review", "Review\n")
            .with_command("commit", "Commit\n");
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), false);

        let report = installer
            .install(ItemKind::Commands, &Selection::All, &mut Diagnostics::new(false))
            .expect("install");
        let permissions = report.fragment.permissions().expect("permissions");
        assert_eq!(permissions.allow, vec!["Skill(commit)", "Skill(review)"]);
    }

    #[test]
    fn hooks_are_copied_and_wired() {
        let fixture = hook_fixture();
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), false);
        let mut diagnostics = Diagnostics::new(false);

        let report = installer
            .install(ItemKind::Hooks, &Selection::All, &mut diagnostics)
            .expect("install");
        assert_eq!(report.installed, vec!["guard.py", "fmt.sh"]);
        assert_eq!(diagnostics.skipped().len(), 1);

        let hooks = report.fragment.hooks().expect("hooks");
        let pre = hooks.groups("PreToolUse").expect("pre");
        assert_eq!(pre.len(), 1);
        assert_eq!(pre[0].hooks.len(), 1);
        assert_eq!(
            pre[0].hooks[0].command.as_deref(),
            Some("python3 .claude/hooks/guard.py")
        );
        assert!(hooks.groups("PostToolUse").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn shell_hooks_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = hook_fixture();
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), false);
        installer
            .install(
                ItemKind::Hooks,
                &Selection::Profile("shell".to_string()),
                &mut Diagnostics::new(false),
            )
            .expect("install");

        let path = fixture.target_dir().join(".claude/hooks/fmt.sh");
        let mode = fs::metadata(path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(fixture.installed("hooks/guard.py").is_none());
    }

    #[test]
    fn skills_replace_previous_copy() {
        let fixture = TestFixture::new()
            .with_skill("caching", "---\nname: caching\n---\nv2\n")
            .with_source_file("skills/caching/reference/notes.md", "notes\n")
            .with_target_file(".claude/skills/caching/stale.md", "old\n");
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), false);

        let report = installer
            .install(ItemKind::Skills, &Selection::All, &mut Diagnostics::new(false))
            .expect("install");
        assert_eq!(report.installed, vec!["caching/"]);
        assert!(report.fragment.is_empty());
        assert!(fixture.installed("skills/caching/SKILL.md").is_some());
        assert_eq!(
            fixture.installed("skills/caching/reference/notes.md").as_deref(),
            Some("notes\n")
        );
        assert!(fixture.installed("skills/caching/stale.md").is_none());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let fixture = hook_fixture().with_skill("caching", "---\nname: caching\n---\n");
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), true);
        let mut diagnostics = Diagnostics::new(false);

        for kind in ItemKind::all() {
            let report = installer
                .install(kind, &Selection::All, &mut diagnostics)
                .expect("install");
            if kind == ItemKind::Hooks {
                assert!(report.fragment.hooks().is_some());
            }
        }
        assert!(!fixture.target_dir().join(".claude").exists());
    }

    #[test]
    fn nothing_selected_creates_nothing() {
        let fixture = TestFixture::new();
        let catalog = fixture.catalog();
        let installer = Installer::new(&catalog, fixture.target_dir(), false);
        let report = installer
            .install(ItemKind::Agents, &Selection::All, &mut Diagnostics::new(false))
            .expect("install");
        assert!(report.installed.is_empty());
        assert!(!report.target_dir.exists());
    }
}
