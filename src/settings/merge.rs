//! Merge engine folding settings fragments into one document.
//!
//! Each top-level section has a fixed strategy:
//!
//! - `hooks`: entries are concatenated per `(hook type, matcher)` and then
//!   deduplicated by command, first occurrence kept.
//! - `permissions`: `allow`/`deny`/`ask` are concatenated and deduplicated,
//!   first occurrence kept; other permission keys are last-writer-wins.
//! - anything else: last writer wins.
//!
//! Output keys, hook types and matcher groups are ordered by first appearance
//! across the whole fold.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::document::{
    HOOKS_KEY, HookEntry, HookTable, MatcherGroup, PERMISSIONS_KEY, Passthrough, Permissions,
    Section, SettingsDocument,
};

/// Merge documents in order. The first is conventionally the persisted state.
pub fn merge<'a, I>(documents: I) -> SettingsDocument
where
    I: IntoIterator<Item = &'a SettingsDocument>,
{
    let mut fold = Fold::default();
    for document in documents {
        fold.absorb(document);
    }
    fold.finish()
}

/// Accumulated state while folding documents.
#[derive(Debug, Default)]
struct Fold {
    /// Top-level keys in order of first appearance.
    order: Vec<String>,
    /// Hook accumulator; present once any document had a `hooks` key.
    hooks: Option<HookFold>,
    /// Permission accumulator; present once any document had `permissions`.
    permissions: Option<Permissions>,
    /// Latest value for each passthrough key.
    passthrough: Map<String, Value>,
}

impl Fold {
    /// Fold one document into the accumulators.
    fn absorb(&mut self, document: &SettingsDocument) {
        for section in document.sections() {
            if !self.order.iter().any(|key| key == section.key()) {
                self.order.push(section.key().to_string());
            }
            match section {
                Section::Hooks(table) => self.hooks.get_or_insert_default().absorb(table),
                Section::Permissions(permissions) => {
                    absorb_permissions(self.permissions.get_or_insert_default(), permissions);
                }
                Section::Other(entry) => {
                    self.passthrough.insert(entry.key().to_string(), entry.value().clone());
                }
            }
        }
    }

    /// Deduplicate accumulators and build the merged document.
    fn finish(self) -> SettingsDocument {
        let Self {
            order,
            mut hooks,
            mut permissions,
            mut passthrough,
        } = self;

        let mut document = SettingsDocument::new();
        for key in order {
            if key == HOOKS_KEY {
                if let Some(table) = hooks.take().and_then(HookFold::finish) {
                    document.insert(Section::Hooks(table));
                }
            } else if key == PERMISSIONS_KEY {
                if let Some(permissions) = permissions.take() {
                    document.insert(Section::Permissions(finish_permissions(permissions)));
                }
            } else if let Some(entry) = passthrough
                .remove(&key)
                .and_then(|value| Passthrough::new(key, value))
            {
                document.insert(Section::Other(entry));
            }
        }
        document
    }
}

/// Hook entries gathered per hook type and matcher.
#[derive(Debug, Default)]
struct HookFold {
    /// Hook types in order of first appearance.
    events: Vec<EventFold>,
}

/// Matcher groups gathered for one hook type.
#[derive(Debug)]
struct EventFold {
    /// Hook type name.
    event: String,
    /// Groups in order of first appearance of their matcher.
    groups: Vec<GroupFold>,
}

/// Entries gathered for one matcher, not yet deduplicated.
#[derive(Debug)]
struct GroupFold {
    /// Matcher value shared by every contributing group.
    matcher: Option<String>,
    /// Extra fields from the first contributing group.
    extra: Map<String, Value>,
    /// Entries in arrival order.
    entries: Vec<HookEntry>,
}

impl HookFold {
    /// Append every group of a table onto its accumulator.
    fn absorb(&mut self, table: &HookTable) {
        for (event, groups) in table.iter() {
            let slot = self.event_mut(event);
            for group in groups {
                slot.group_mut(group)
                    .entries
                    .extend(group.hooks.iter().cloned());
            }
        }
    }

    /// Find or create the accumulator for a hook type.
    fn event_mut(&mut self, event: &str) -> &mut EventFold {
        let index = match self.events.iter().position(|slot| slot.event == event) {
            Some(index) => index,
            None => {
                self.events.push(EventFold {
                    event: event.to_string(),
                    groups: Vec::new(),
                });
                self.events.len() - 1
            }
        };
        &mut self.events[index]
    }

    /// Build the table, or `None` when no hook type kept any entry.
    fn finish(self) -> Option<HookTable> {
        let mut table = HookTable::new();
        for slot in self.events {
            let groups = slot
                .groups
                .into_iter()
                .filter_map(GroupFold::finish)
                .collect::<Vec<_>>();
            if !groups.is_empty() {
                table.insert(slot.event, groups);
            }
        }
        (!table.is_empty()).then_some(table)
    }
}

impl EventFold {
    /// Find or create the accumulator for a group's matcher.
    fn group_mut(&mut self, group: &MatcherGroup) -> &mut GroupFold {
        let index = match self
            .groups
            .iter()
            .position(|slot| slot.matcher == group.matcher)
        {
            Some(index) => index,
            None => {
                self.groups.push(GroupFold {
                    matcher: group.matcher.clone(),
                    extra: group.extra.clone(),
                    entries: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }
}

impl GroupFold {
    /// Deduplicate entries; groups left empty are dropped.
    fn finish(self) -> Option<MatcherGroup> {
        let hooks = dedupe_entries(self.entries);
        if hooks.is_empty() {
            return None;
        }
        Some(MatcherGroup {
            matcher: self.matcher,
            hooks,
            extra: self.extra,
        })
    }
}

/// Keep the first entry for each identity, preserving order.
fn dedupe_entries(entries: Vec<HookEntry>) -> Vec<HookEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.identity()))
        .collect()
}

/// Concatenate permission lists and overwrite other permission keys.
fn absorb_permissions(into: &mut Permissions, from: &Permissions) {
    into.allow.extend(from.allow.iter().cloned());
    into.deny.extend(from.deny.iter().cloned());
    into.ask.extend(from.ask.iter().cloned());
    for (key, value) in &from.extra {
        into.extra.insert(key.clone(), value.clone());
    }
}

/// Deduplicate each permission list.
fn finish_permissions(permissions: Permissions) -> Permissions {
    Permissions {
        allow: dedupe_strings(permissions.allow),
        deny: dedupe_strings(permissions.deny),
        ask: dedupe_strings(permissions.ask),
        extra: permissions.extra,
    }
}

/// Keep the first occurrence of each string, preserving order.
fn dedupe_strings(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
