//! Catalog of installable items found in a source root.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    frontmatter::{Frontmatter, parse_document},
    kind::ItemKind,
    manifest::{HookDefinition, HookManifest, MANIFEST_FILE_NAME},
    paths::display_path,
};

/// The expected skill file name within a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// File extension of agent and command definitions.
const MARKDOWN_EXTENSION: &str = "md";

/// A file-backed item (agent, command or skill) available for install.
#[derive(Debug, Clone)]
pub struct Item {
    /// Install name: file stem for agents and commands, directory name for skills.
    pub(crate) name: String,
    /// Definition file, or skill directory.
    pub(crate) path: PathBuf,
    /// Metadata from the definition's frontmatter.
    pub(crate) frontmatter: Frontmatter,
    /// First non-empty line of the body.
    pub(crate) summary: Option<String>,
}

/// Which items of a kind to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every available item.
    All,
    /// Specific items, in the order given.
    Named(Vec<String>),
    /// The hooks of a named profile; other kinds install everything.
    Profile(String),
}

/// In-memory catalog of a source root.
#[derive(Debug)]
pub struct Catalog {
    /// Source root the catalog was loaded from.
    pub(crate) root: PathBuf,
    /// Agents sorted by name.
    pub(crate) agents: Vec<Item>,
    /// Commands sorted by name.
    pub(crate) commands: Vec<Item>,
    /// Skills sorted by name.
    pub(crate) skills: Vec<Item>,
    /// Hook definitions and profiles.
    pub(crate) hooks: HookManifest,
}

impl Catalog {
    /// Load every kind from a source root.
    pub(crate) fn load(root: &Path, diagnostics: &mut Diagnostics) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::SourceMissing {
                path: root.to_path_buf(),
            });
        }

        let agents = load_markdown_items(&ItemKind::Agents.source_dir(root), diagnostics);
        let commands = load_markdown_items(&ItemKind::Commands.source_dir(root), diagnostics);
        let skills = load_skills(&ItemKind::Skills.source_dir(root), diagnostics);
        let hooks =
            HookManifest::load(&ItemKind::Hooks.source_dir(root).join(MANIFEST_FILE_NAME))?;

        diagnostics.detail(format!(
            "Loaded {} agent(s), {} command(s), {} hook(s), {} skill(s) from {}",
            agents.len(),
            commands.len(),
            hooks.hooks.len(),
            skills.len(),
            display_path(root)
        ));

        Ok(Self {
            root: root.to_path_buf(),
            agents,
            commands,
            skills,
            hooks,
        })
    }

    /// Return the file-backed items of a kind. Hooks come from the manifest
    /// instead and yield an empty slice here.
    pub(crate) fn items(&self, kind: ItemKind) -> &[Item] {
        match kind {
            ItemKind::Agents => &self.agents,
            ItemKind::Commands => &self.commands,
            ItemKind::Skills => &self.skills,
            ItemKind::Hooks => &[],
        }
    }

    /// Return the source directory holding hook scripts.
    pub(crate) fn hooks_dir(&self) -> PathBuf {
        ItemKind::Hooks.source_dir(&self.root)
    }

    /// Resolve a selection of file-backed items; unknown names are skipped.
    pub(crate) fn select_items(
        &self,
        kind: ItemKind,
        selection: &Selection,
        diagnostics: &mut Diagnostics,
    ) -> Vec<&Item> {
        let items = self.items(kind);
        let Selection::Named(names) = selection else {
            return items.iter().collect();
        };

        let mut selected: Vec<&Item> = Vec::new();
        for name in names {
            if selected.iter().any(|item| &item.name == name) {
                continue;
            }
            match items.iter().find(|item| &item.name == name) {
                Some(item) => selected.push(item),
                None => diagnostics.warn_skipped(
                    name.clone(),
                    format!(
                        "no {} named '{name}' in {}",
                        kind.singular(),
                        display_path(&kind.source_dir(&self.root))
                    ),
                ),
            }
        }
        selected
    }

    /// Resolve a selection of hooks by id or profile.
    pub(crate) fn select_hooks(
        &self,
        selection: &Selection,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<&HookDefinition>> {
        let ids = match selection {
            Selection::All => return Ok(self.hooks.hooks.iter().collect()),
            Selection::Named(ids) => ids.clone(),
            Selection::Profile(name) => self.hooks.profile(name)?.hooks.clone(),
        };

        let mut selected: Vec<&HookDefinition> = Vec::new();
        for id in &ids {
            if selected.iter().any(|hook| &hook.id == id) {
                continue;
            }
            match self.hooks.hook(id) {
                Some(hook) => selected.push(hook),
                None => diagnostics.warn_skipped(
                    id.clone(),
                    format!("no hook with id '{id}' in {MANIFEST_FILE_NAME}"),
                ),
            }
        }
        Ok(selected)
    }
}

/// Load `*.md` definitions from a directory, sorted by name.
fn load_markdown_items(dir: &Path, diagnostics: &mut Diagnostics) -> Vec<Item> {
    let mut items = Vec::new();
    for entry in read_directory(dir, diagnostics) {
        let path = entry.path();
        if !path.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(MARKDOWN_EXTENSION)
        {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let name = name.to_string();
        if let Some(item) = load_item(name, path.clone(), &path, diagnostics) {
            items.push(item);
        }
    }
    items
}

/// Load skill directories containing a skill file, sorted by name.
fn load_skills(dir: &Path, diagnostics: &mut Diagnostics) -> Vec<Item> {
    let mut items = Vec::new();
    for entry in read_directory(dir, diagnostics) {
        let skill_dir = entry.path();
        let skill_path = skill_dir.join(SKILL_FILE_NAME);
        if !skill_path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(item) = load_item(name, skill_dir, &skill_path, diagnostics) {
            items.push(item);
        }
    }
    items
}

/// Read a definition file and build its catalog entry.
fn load_item(
    name: String,
    path: PathBuf,
    definition: &Path,
    diagnostics: &mut Diagnostics,
) -> Option<Item> {
    let contents = match fs::read_to_string(definition) {
        Ok(contents) => contents,
        Err(error) => {
            diagnostics.warn_skipped(definition.display().to_string(), error.to_string());
            return None;
        }
    };

    let document = parse_document(&contents);
    if let Some(declared) = &document.frontmatter.name
        && declared != &name
    {
        diagnostics.warn(format!(
            "{} declares name '{declared}' but installs as '{name}'",
            display_path(definition)
        ));
    }
    let summary = document
        .body
        .lines()
        .map(|line| line.trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string);

    Some(Item {
        name,
        path,
        frontmatter: document.frontmatter,
        summary,
    })
}

/// Read a directory and return sorted entries, returning empty on missing.
fn read_directory(path: &Path, diagnostics: &mut Diagnostics) -> Vec<fs::DirEntry> {
    let mut entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(error) => {
            diagnostics.warn(format!(
                "failed to read directory {}: {error}",
                path.display()
            ));
            return Vec::new();
        }
    }
    .filter_map(|entry| entry.ok())
    .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.file_name());
    entries
}
