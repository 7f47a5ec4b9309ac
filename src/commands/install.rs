//! Implementation of the `claudekit install` command.

use std::path::{Path, PathBuf};

use crate::{
    catalog::{Catalog, Selection},
    commands::{ColorChoice, resolve_source},
    diagnostics::Diagnostics,
    diff::settings_diff,
    error::{Error, Result},
    install::{InstallReport, Installer},
    kind::{ItemKind, KindFilter},
    palette::{fmt_item_name, fmt_label, fmt_path, fmt_success},
    paths::{display_path, resolve_cli_path},
    settings::store::{self, SettingsFile, SettingsUpdate, settings_path},
};

/// Arguments accepted by the install command.
#[derive(Debug, Clone)]
pub struct InstallArgs {
    /// Kinds to install.
    pub(crate) kind: KindFilter,
    /// Item names or hook ids; empty selects everything.
    pub(crate) items: Vec<String>,
    /// Hook profile to install.
    pub(crate) profile: Option<String>,
    /// Target project directory; defaults to the current directory.
    pub(crate) target: Option<PathBuf>,
    /// Preview without writing.
    pub(crate) dry_run: bool,
}

/// Result of installing into a target before the settings are written.
#[derive(Debug)]
struct Installation {
    /// One report per installed kind, in install order.
    reports: Vec<InstallReport>,
    /// Pending settings change, absent when no fragment had content.
    update: Option<SettingsUpdate>,
}

/// Execute the install command.
pub async fn run(
    color: ColorChoice,
    verbose: bool,
    source: Option<PathBuf>,
    args: InstallArgs,
) -> Result<()> {
    let source = resolve_source(source).await?;
    let target = resolve_cli_path(args.target.clone())?;
    if !target.is_dir() {
        return Err(Error::PathMissing { path: target });
    }

    let mut diagnostics = Diagnostics::new(verbose);
    let use_color = color.enabled();
    let catalog = Catalog::load(&source, &mut diagnostics)?;
    let plan = plan(&args, &mut diagnostics);

    diagnostics.detail(format!(
        "Installing from {} into {}",
        display_path(&source),
        display_path(&target)
    ));

    let installation = install_into(&catalog, &target, &plan, args.dry_run, &mut diagnostics)?;
    for report in &installation.reports {
        print_report(report, args.dry_run, use_color);
    }

    if let Some(update) = &installation.update {
        finish_update(update, args.dry_run, use_color)?;
    }

    println!();
    if args.dry_run {
        println!("{} nothing was written.", fmt_label("Dry run:", use_color));
    } else {
        println!("{}", fmt_success("Done!", use_color));
    }

    diagnostics.print_skipped_summary();
    diagnostics.print_warning_summary();
    Ok(())
}

/// Turn the command arguments into a per-kind selection.
fn plan(args: &InstallArgs, diagnostics: &mut Diagnostics) -> Vec<(ItemKind, Selection)> {
    let kinds = args.kind.to_kinds();

    if args.kind == KindFilter::All && !args.items.is_empty() {
        diagnostics.warn("item names are ignored when installing all kinds");
    }
    if args.profile.is_some() && !kinds.contains(&ItemKind::Hooks) {
        diagnostics.warn("--profile only applies to hooks and is ignored");
    }
    if args.kind == KindFilter::Hooks && args.profile.is_some() && !args.items.is_empty() {
        diagnostics.warn("hook ids are ignored when --profile is given");
    }

    kinds
        .into_iter()
        .map(|kind| {
            let selection = match (&args.profile, kind) {
                (Some(profile), ItemKind::Hooks) => Selection::Profile(profile.clone()),
                _ if args.kind == KindFilter::All || args.items.is_empty() => Selection::All,
                _ => Selection::Named(args.items.clone()),
            };
            (kind, selection)
        })
        .collect()
}

/// Copy the planned items into `target` and compute the settings change.
///
/// Profiles and the existing settings file are validated before anything is
/// copied, so a bad profile or malformed settings leave the target untouched.
fn install_into(
    catalog: &Catalog,
    target: &Path,
    plan: &[(ItemKind, Selection)],
    dry_run: bool,
    diagnostics: &mut Diagnostics,
) -> Result<Installation> {
    for (_, selection) in plan {
        if let Selection::Profile(name) = selection {
            catalog.hooks.profile(name)?;
        }
    }

    let settings = SettingsFile::read(&settings_path(target))?;

    let installer = Installer::new(catalog, target, dry_run);
    let mut reports = Vec::with_capacity(plan.len());
    for (kind, selection) in plan {
        reports.push(installer.install(*kind, selection, diagnostics)?);
    }

    let fragments = reports
        .iter()
        .map(|report| report.fragment.clone())
        .collect::<Vec<_>>();
    let update = settings.plan(&fragments)?;

    Ok(Installation { reports, update })
}

/// Print what was copied for one kind.
fn print_report(report: &InstallReport, dry_run: bool, use_color: bool) {
    if report.installed.is_empty() {
        println!("No {} selected.", report.kind.dir_name());
        return;
    }

    let verb = if dry_run { "Would install" } else { "Installing" };
    println!(
        "{verb} {} {}(s) to {}",
        report.installed.len(),
        report.kind.singular(),
        fmt_path(&display_path(&report.target_dir), use_color)
    );
    let action = if dry_run { "Would copy" } else { "Copied" };
    for name in &report.installed {
        println!("  {action}: {}", fmt_item_name(name, use_color));
    }
}

/// Show or write the settings change.
fn finish_update(update: &SettingsUpdate, dry_run: bool, use_color: bool) -> Result<()> {
    let path = display_path(&update.path);
    if !update.changed() {
        println!("{} {path}", fmt_label("Unchanged:", use_color));
        return Ok(());
    }

    if dry_run {
        println!("{} {path}", fmt_label("Would update:", use_color));
        print!(
            "{}",
            settings_diff(&path, update.before.as_deref(), &update.after, use_color)
        );
        return Ok(());
    }

    store::apply(update)?;
    println!("{} {path}", fmt_label("Updated:", use_color));
    Ok(())
}
