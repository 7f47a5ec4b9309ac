//! Item kinds and their install locations.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::paths::CLAUDE_DIR;

/// Installable item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Subagent definitions (`agents/<name>.md`).
    Agents,
    /// Slash commands (`commands/<name>.md`).
    Commands,
    /// Hook scripts listed in `hooks/hooks.json`.
    Hooks,
    /// Skill directories (`skills/<name>/SKILL.md`).
    Skills,
}

/// Kind filter for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    /// Agents only.
    Agents,
    /// Commands only.
    Commands,
    /// Hooks only.
    Hooks,
    /// Skills only.
    Skills,
    /// Every kind.
    All,
}

impl KindFilter {
    /// Convert filter to list of kinds, in install order.
    pub fn to_kinds(self) -> Vec<ItemKind> {
        match self {
            Self::Agents => vec![ItemKind::Agents],
            Self::Commands => vec![ItemKind::Commands],
            Self::Hooks => vec![ItemKind::Hooks],
            Self::Skills => vec![ItemKind::Skills],
            Self::All => ItemKind::all().to_vec(),
        }
    }
}

impl ItemKind {
    /// Return all kinds in install order.
    pub(crate) fn all() -> [Self; 4] {
        [Self::Agents, Self::Commands, Self::Hooks, Self::Skills]
    }

    /// Directory name used both in the source root and under `.claude/`.
    pub(crate) fn dir_name(self) -> &'static str {
        match self {
            Self::Agents => "agents",
            Self::Commands => "commands",
            Self::Hooks => "hooks",
            Self::Skills => "skills",
        }
    }

    /// Singular noun for messages.
    pub(crate) fn singular(self) -> &'static str {
        match self {
            Self::Agents => "agent",
            Self::Commands => "command",
            Self::Hooks => "hook",
            Self::Skills => "skill",
        }
    }

    /// Heading used in listings.
    pub(crate) fn title(self) -> &'static str {
        match self {
            Self::Agents => "Available Agents",
            Self::Commands => "Available Commands",
            Self::Hooks => "Available Hooks",
            Self::Skills => "Available Skills",
        }
    }

    /// Return the directory in the source root holding this kind.
    pub(crate) fn source_dir(self, source: &Path) -> PathBuf {
        source.join(self.dir_name())
    }

    /// Return the directory in a target project this kind installs into.
    pub(crate) fn install_dir(self, target: &Path) -> PathBuf {
        target.join(CLAUDE_DIR).join(self.dir_name())
    }
}
