//! Hook manifest (`hooks/hooks.json`) describing installable hooks and profiles.

use std::{collections::BTreeMap, fs, io::ErrorKind, path::Path};

use serde::Deserialize;

use crate::error::{Error, Result};

/// File name of the hook manifest inside the source hooks directory.
pub const MANIFEST_FILE_NAME: &str = "hooks.json";

/// Hook types a manifest entry can be wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum HookEvent {
    /// Runs before a tool call.
    PreToolUse,
    /// Runs after a tool call.
    PostToolUse,
}

impl HookEvent {
    /// Return all events in settings output order.
    pub(crate) fn all() -> [Self; 2] {
        [Self::PreToolUse, Self::PostToolUse]
    }

    /// Return the settings key for this event.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
        }
    }
}

/// A hook available for installation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDefinition {
    /// Identifier used on the command line and in profiles.
    pub(crate) id: String,
    /// Human-readable name.
    pub(crate) name: String,
    /// One-line description.
    #[serde(default)]
    pub(crate) description: String,
    /// Script file name inside the hooks directory.
    pub(crate) file: String,
    /// Event the hook is wired to.
    #[serde(rename = "type")]
    pub(crate) event: HookEvent,
    /// Tool matcher pattern.
    pub(crate) matcher: String,
    /// Free-form tags shown in listings.
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    /// External tools the hook needs.
    #[serde(default)]
    pub(crate) requires: Vec<String>,
    /// Status message override; defaults to the name.
    #[serde(default)]
    pub(crate) status_message: Option<String>,
}

impl HookDefinition {
    /// Interpreter used to run the hook script.
    pub(crate) fn interpreter(&self) -> &'static str {
        if self.file.ends_with(".py") {
            "python3"
        } else {
            "bash"
        }
    }

    /// Command line wired into settings, relative to the project root.
    pub(crate) fn command(&self) -> String {
        format!("{} .claude/hooks/{}", self.interpreter(), self.file)
    }

    /// Status message shown while the hook runs.
    pub(crate) fn status_message(&self) -> &str {
        self.status_message.as_deref().unwrap_or(&self.name)
    }

    /// Whether the installed file should be marked executable.
    pub(crate) fn is_shell_script(&self) -> bool {
        self.file.ends_with(".sh")
    }
}

/// A named group of hooks installed together.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// One-line description.
    #[serde(default)]
    pub(crate) description: String,
    /// Hook ids in install order.
    #[serde(default)]
    pub(crate) hooks: Vec<String>,
}

/// Parsed hook manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookManifest {
    /// Hooks in manifest order.
    #[serde(default)]
    pub(crate) hooks: Vec<HookDefinition>,
    /// Profiles keyed by name.
    #[serde(default)]
    pub(crate) profiles: BTreeMap<String, Profile>,
}

impl HookManifest {
    /// Load a manifest, treating a missing file as empty.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => {
                return Err(Error::ManifestRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|error| Error::ManifestParse {
            path: path.to_path_buf(),
            source: error,
        })
    }

    /// Look up a hook by id.
    pub(crate) fn hook(&self, id: &str) -> Option<&HookDefinition> {
        self.hooks.iter().find(|hook| hook.id == id)
    }

    /// Look up a profile, failing with the list of known profiles.
    pub(crate) fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles.get(name).ok_or_else(|| Error::UnknownProfile {
            name: name.to_string(),
            available: if self.profiles.is_empty() {
                "none".to_string()
            } else {
                self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
            },
        })
    }
}
