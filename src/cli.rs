//! CLI parsing and command dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    commands::{self, install::InstallArgs},
    error::Result,
    kind::KindFilter,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "claudekit",
    version,
    about = "Install agents, commands, hooks and skills into a project's .claude directory"
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long, global = true)]
    verbose: bool,
    /// Tooling source directory (overrides the config file).
    #[arg(long, global = true)]
    source: Option<PathBuf>,
    /// Command to execute (defaults to list).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize a claudekit config file.
    Init,
    /// Install items into a target project and update its settings.
    Install {
        /// Kind of items to install.
        #[arg(value_enum)]
        kind: KindFilter,
        /// Item names or hook ids (omit for all items of the kind).
        items: Vec<String>,
        /// Install the hooks of a named profile.
        #[arg(long, short = 'p')]
        profile: Option<String>,
        /// Target project directory (defaults to the current directory).
        #[arg(long, short = 't')]
        target: Option<PathBuf>,
        /// Preview copies and the settings diff without writing.
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
    /// List available items in the source directory.
    #[command(alias = "ls")]
    List {
        /// Kind of items to list.
        #[arg(value_enum, default_value = "all")]
        kind: KindFilter,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let color = cli.color.into_choice();
    let command = cli.command.unwrap_or(Command::List {
        kind: KindFilter::All,
    });

    // Match arms are ordered alphabetically - maintain this order.
    match command {
        Command::Init => commands::init::run().await,
        Command::Install {
            kind,
            items,
            profile,
            target,
            dry_run,
        } => {
            let args = InstallArgs {
                kind,
                items,
                profile,
                target,
                dry_run,
            };
            commands::install::run(color, cli.verbose, cli.source, args).await
        }
        Command::List { kind } => {
            commands::list::run(color, cli.verbose, cli.source, kind).await
        }
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use crate::kind::KindFilter;

    #[test]
    fn parses_install_with_profile() {
        let cli = Cli::try_parse_from([
            "claudekit", "install", "hooks", "-p", "python", "-t", "proj", "--dry-run",
        ])
        .expect("parse");
        let Some(Command::Install {
            kind,
            items,
            profile,
            dry_run,
            ..
        }) = cli.command
        else {
            panic!("expected install");
        };
        assert_eq!(kind, KindFilter::Hooks);
        assert!(items.is_empty());
        assert_eq!(profile.as_deref(), Some("python"));
        assert!(dry_run);
    }

    #[test]
    fn ls_defaults_to_all_kinds() {
        let cli = Cli::try_parse_from(["claudekit", "ls", "--source", "tooling"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Command::List {
                kind: KindFilter::All
            })
        ));
        assert!(cli.source.is_some());
    }
}
