//! Implementation of the `claudekit list` command.

use std::path::PathBuf;

use crate::{
    catalog::{Catalog, Item},
    commands::{ColorChoice, resolve_source},
    diagnostics::Diagnostics,
    error::Result,
    kind::{ItemKind, KindFilter},
    manifest::HookManifest,
    palette::{fmt_description, fmt_heading, fmt_item_name, fmt_label, fmt_tag},
};

/// Maximum description width for agents.
const AGENT_DESCRIPTION_WIDTH: usize = 80;
/// Maximum description width for commands.
const COMMAND_DESCRIPTION_WIDTH: usize = 60;

/// Execute the list command.
pub async fn run(
    color: ColorChoice,
    verbose: bool,
    source: Option<PathBuf>,
    kind: KindFilter,
) -> Result<()> {
    let source = resolve_source(source).await?;
    let mut diagnostics = Diagnostics::new(verbose);
    let catalog = Catalog::load(&source, &mut diagnostics)?;
    let use_color = color.enabled();

    for (index, kind) in kind.to_kinds().into_iter().enumerate() {
        if index > 0 {
            println!();
        }
        for line in render_kind(&catalog, kind, use_color) {
            println!("{line}");
        }
    }

    diagnostics.print_skipped_summary();
    Ok(())
}

/// Render the listing for one kind.
fn render_kind(catalog: &Catalog, kind: ItemKind, use_color: bool) -> Vec<String> {
    let mut lines = vec![fmt_heading(kind.title(), use_color)];
    match kind {
        ItemKind::Agents => render_agents(&catalog.agents, use_color, &mut lines),
        ItemKind::Commands => render_commands(&catalog.commands, use_color, &mut lines),
        ItemKind::Hooks => render_hooks(&catalog.hooks, use_color, &mut lines),
        ItemKind::Skills => render_skills(&catalog.skills, use_color, &mut lines),
    }
    lines
}

/// Render agents with their model and description.
fn render_agents(items: &[Item], use_color: bool, lines: &mut Vec<String>) {
    if items.is_empty() {
        lines.push(empty_line());
        return;
    }
    for item in items {
        let name = fmt_item_name(&format!("{:<20}", item.name), use_color);
        let model = item
            .frontmatter
            .model
            .as_deref()
            .map(|model| format!(" {}", fmt_tag(&format!("[{model}]"), use_color)))
            .unwrap_or_default();
        let description = item.frontmatter.description.as_deref().unwrap_or("");
        lines.push(format!(
            "  {name}{model} {}",
            fmt_description(&truncate(description, AGENT_DESCRIPTION_WIDTH), use_color)
        ));
    }
}

/// Render commands with their description or first body line.
fn render_commands(items: &[Item], use_color: bool, lines: &mut Vec<String>) {
    if items.is_empty() {
        lines.push(empty_line());
        return;
    }
    for item in items {
        let name = fmt_item_name(&format!("/{:<19}", item.name), use_color);
        let description = item
            .frontmatter
            .description
            .as_deref()
            .or(item.summary.as_deref())
            .unwrap_or("");
        lines.push(format!(
            "  {name} {}",
            fmt_description(&truncate(description, COMMAND_DESCRIPTION_WIDTH), use_color)
        ));
    }
}

/// Render hooks followed by the defined profiles.
fn render_hooks(manifest: &HookManifest, use_color: bool, lines: &mut Vec<String>) {
    if manifest.hooks.is_empty() {
        lines.push(empty_line());
    }
    for hook in &manifest.hooks {
        lines.push(format!(
            "  {} {}",
            fmt_item_name(&format!("{:<20}", hook.id), use_color),
            hook.name
        ));
        if !hook.description.is_empty() {
            lines.push(format!(
                "      {}",
                fmt_description(&hook.description, use_color)
            ));
        }
        if !hook.tags.is_empty() {
            lines.push(format!(
                "      {} {}",
                fmt_label("Tags:", use_color),
                fmt_tag(&hook.tags.join(", "), use_color)
            ));
        }
        if !hook.requires.is_empty() {
            lines.push(format!(
                "      {} {}",
                fmt_label("Requires:", use_color),
                hook.requires.join(", ")
            ));
        }
    }

    if manifest.profiles.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(fmt_heading("Hook Profiles", use_color));
    for (name, profile) in &manifest.profiles {
        lines.push(format!(
            "  {} {}",
            fmt_item_name(&format!("{name:<20}"), use_color),
            fmt_description(&profile.description, use_color)
        ));
        lines.push(format!(
            "      {} {}",
            fmt_label("Hooks:", use_color),
            profile.hooks.join(", ")
        ));
    }
}

/// Render skills with their description.
fn render_skills(items: &[Item], use_color: bool, lines: &mut Vec<String>) {
    if items.is_empty() {
        lines.push(empty_line());
        return;
    }
    for item in items {
        let description = item.frontmatter.description.as_deref().unwrap_or("");
        lines.push(format!(
            "  {} {}",
            fmt_item_name(&format!("{:<25}", item.name), use_color),
            fmt_description(description, use_color)
        ));
    }
}

/// Placeholder for a kind with no items.
fn empty_line() -> String {
    "  (none)".to_string()
}

/// Shorten text to at most `width` characters, marking the cut with `...`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept = text.chars().take(width.saturating_sub(3)).collect::<String>();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{render_kind, truncate};
    use crate::{kind::ItemKind, testutil::TestFixture};

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn renders_agents_with_model() {
        let fixture = TestFixture::new().with_agent(
            "reader",
            "---\nname: reader\ndescription: Reads code\nmodel: haiku\n---\nBody\n",
        );
        let lines = render_kind(&fixture.catalog(), ItemKind::Agents, false);
        assert_eq!(
            lines,
            vec![
                "Available Agents".to_string(),
                format!("  {:<20} [haiku] Reads code", "reader"),
            ]
        );
    }

    #[test]
    fn commands_fall_back_to_first_body_line() {
        let fixture = TestFixture::new().with_command("review", "# Review the diff\n\nMore\n");
        let lines = render_kind(&fixture.catalog(), ItemKind::Commands, false);
        assert_eq!(lines[1], format!("  /{:<19} Review the diff", "review"));
    }

    #[test]
    fn renders_hooks_and_profiles() {
        let fixture = TestFixture::new().with_manifest(
            r#"{
                "hooks": [{"id": "guard", "name": "Guard", "description": "Blocks rm", "file": "guard.py",
                           "type": "PreToolUse", "matcher": "Bash", "tags": ["safety"], "requires": ["python3"]}],
                "profiles": {"safe": {"description": "Safety hooks", "hooks": ["guard"]}}
            }"#,
        );
        let lines = render_kind(&fixture.catalog(), ItemKind::Hooks, false);
        assert_eq!(
            lines,
            vec![
                "Available Hooks".to_string(),
                format!("  {:<20} Guard", "guard"),
                "      Blocks rm".to_string(),
                "      Tags: safety".to_string(),
                "      Requires: python3".to_string(),
                String::new(),
                "Hook Profiles".to_string(),
                format!("  {:<20} Safety hooks", "safe"),
                "      Hooks: guard".to_string(),
            ]
        );
    }

    #[test]
    fn empty_kinds_say_none() {
        let fixture = TestFixture::new();
        for kind in ItemKind::all() {
            let lines = render_kind(&fixture.catalog(), kind, false);
            assert_eq!(lines[1], "  (none)");
        }
    }
}
