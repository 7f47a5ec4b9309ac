//! Settings fragments produced by installing a batch of items.

use crate::{
    manifest::{HookDefinition, HookEvent},
    settings::document::{
        HookEntry, HookTable, MatcherGroup, Permissions, Section, SettingsDocument,
    },
};

/// Build the fragment wiring the given hooks, grouped by event then matcher.
///
/// `PreToolUse` comes before `PostToolUse`; matchers keep the order in which
/// they first appear among the hooks.
pub fn hook_fragment(hooks: &[&HookDefinition]) -> SettingsDocument {
    let mut table = HookTable::new();
    for event in HookEvent::all() {
        let mut groups: Vec<MatcherGroup> = Vec::new();
        for hook in hooks.iter().filter(|hook| hook.event == event) {
            let entry = HookEntry::command(hook.command(), hook.status_message());
            match groups
                .iter_mut()
                .find(|group| group.matcher.as_deref() == Some(hook.matcher.as_str()))
            {
                Some(group) => group.hooks.push(entry),
                None => groups.push(MatcherGroup::new(hook.matcher.clone(), vec![entry])),
            }
        }
        if !groups.is_empty() {
            table.insert(event.as_str(), groups);
        }
    }

    if table.is_empty() {
        SettingsDocument::new()
    } else {
        SettingsDocument::new().with(Section::Hooks(table))
    }
}

/// Build the fragment allowing each installed command to run as a skill.
pub fn command_fragment<S: AsRef<str>>(names: &[S]) -> SettingsDocument {
    if names.is_empty() {
        return SettingsDocument::new();
    }
    let allow = names
        .iter()
        .map(|name| format!("Skill({})", name.as_ref()))
        .collect();
    SettingsDocument::new().with(Section::Permissions(Permissions::allowing(allow)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{command_fragment, hook_fragment};
    use crate::manifest::HookManifest;

    fn manifest() -> HookManifest {
        serde_json::from_str(
            r#"{"hooks": [
                {"id": "fmt", "name": "Format", "file": "fmt.sh", "type": "PostToolUse", "matcher": "Edit"},
                {"id": "guard", "name": "Guard", "file": "guard.py", "type": "PreToolUse", "matcher": "Bash"},
                {"id": "lint", "name": "Lint", "file": "lint.py", "type": "PostToolUse", "matcher": "Write"},
                {"id": "types", "name": "Types", "file": "types.py", "type": "PostToolUse", "matcher": "Edit"}
            ]}"#,
        )
        .expect("manifest")
    }

    #[test]
    fn groups_hooks_by_event_and_matcher() {
        let manifest = manifest();
        let hooks = manifest.hooks.iter().collect::<Vec<_>>();
        let fragment = hook_fragment(&hooks);
        let rendered = serde_json::to_string(&fragment).expect("render");
        assert_eq!(
            rendered,
            concat!(
                r#"{"hooks":{"PreToolUse":[{"matcher":"Bash","hooks":["#,
                r#"{"type":"command","command":"python3 .claude/hooks/guard.py","statusMessage":"Guard"}]}],"#,
                r#""PostToolUse":[{"matcher":"Edit","hooks":["#,
                r#"{"type":"command","command":"bash .claude/hooks/fmt.sh","statusMessage":"Format"},"#,
                r#"{"type":"command","command":"python3 .claude/hooks/types.py","statusMessage":"Types"}]},"#,
                r#"{"matcher":"Write","hooks":["#,
                r#"{"type":"command","command":"python3 .claude/hooks/lint.py","statusMessage":"Lint"}]}]}}"#
            )
        );
    }

    #[test]
    fn no_hooks_means_empty_fragment() {
        assert!(hook_fragment(&[]).is_empty());
    }

    #[test]
    fn allows_commands_as_skills() {
        let fragment = command_fragment(&["review", "commit"]);
        let rendered = serde_json::to_string(&fragment).expect("render");
        assert_eq!(
            rendered,
            r#"{"permissions":{"allow":["Skill(review)","Skill(commit)"],"deny":[],"ask":[]}}"#
        );
        assert!(command_fragment::<&str>(&[]).is_empty());
    }
}
