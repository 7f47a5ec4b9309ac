//! Typed model of a settings document.
//!
//! The document keeps its top-level keys in the order they first appeared so
//! that a file read from disk and written back unchanged is byte-identical.
//! `hooks` and `permissions` are parsed into typed sections; every other key
//! is carried as an opaque JSON value.

use std::fmt::{Formatter, Result as FmtResult};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use serde_json::{Map, Value};

/// Top-level key holding hook wiring.
pub const HOOKS_KEY: &str = "hooks";
/// Top-level key holding permission rules.
pub const PERMISSIONS_KEY: &str = "permissions";
/// Hook entry type used for shell command hooks.
pub const COMMAND_HOOK_TYPE: &str = "command";

/// A settings document: an ordered set of top-level sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    /// Sections in key order; each key appears at most once.
    sections: Vec<Section>,
}

/// One top-level entry of a settings document.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// The `hooks` table.
    Hooks(HookTable),
    /// The `permissions` rules.
    Permissions(Permissions),
    /// Any other key, passed through untouched.
    Other(Passthrough),
}

/// An opaque top-level entry. Never holds `hooks` or `permissions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Passthrough {
    /// Top-level key.
    key: String,
    /// Opaque value.
    value: Value,
}

impl Passthrough {
    /// Wrap an entry, or `None` when the key names a typed section.
    pub fn new(key: impl Into<String>, value: Value) -> Option<Self> {
        let key = key.into();
        if key == HOOKS_KEY || key == PERMISSIONS_KEY {
            return None;
        }
        Some(Self { key, value })
    }

    /// Return the top-level key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return the carried value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Section {
    /// Return the top-level key this section is stored under.
    pub fn key(&self) -> &str {
        match self {
            Self::Hooks(_) => HOOKS_KEY,
            Self::Permissions(_) => PERMISSIONS_KEY,
            Self::Other(entry) => entry.key.as_str(),
        }
    }

    /// Build the section for a top-level entry.
    ///
    /// `hooks` and `permissions` are parsed into their typed sections and
    /// fail when the value does not have the expected structure.
    pub fn from_entry(key: impl Into<String>, value: Value) -> serde_json::Result<Self> {
        let key = key.into();
        Ok(if key == HOOKS_KEY {
            Self::Hooks(serde_json::from_value(value)?)
        } else if key == PERMISSIONS_KEY {
            Self::Permissions(serde_json::from_value(value)?)
        } else {
            Self::Other(Passthrough { key, value })
        })
    }
}

impl SettingsDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON text.
    ///
    /// Fails when the text is not a JSON object, or when `hooks` or
    /// `permissions` do not have the expected structure.
    pub fn from_json_str(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Render the document as pretty-printed JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Return true when the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Return the sections in key order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Return the hooks table, if present.
    pub fn hooks(&self) -> Option<&HookTable> {
        self.sections.iter().find_map(|section| match section {
            Section::Hooks(table) => Some(table),
            _ => None,
        })
    }

    /// Return the permission rules, if present.
    pub fn permissions(&self) -> Option<&Permissions> {
        self.sections.iter().find_map(|section| match section {
            Section::Permissions(permissions) => Some(permissions),
            _ => None,
        })
    }

    /// Return a passthrough value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.sections.iter().find_map(|section| match section {
            Section::Other(entry) if entry.key == key => Some(&entry.value),
            _ => None,
        })
    }

    /// Insert a section, replacing an existing section with the same key in place.
    pub fn insert(&mut self, section: Section) {
        match self
            .sections
            .iter_mut()
            .find(|existing| existing.key() == section.key())
        {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    /// Builder form of [`SettingsDocument::insert`].
    pub fn with(mut self, section: Section) -> Self {
        self.insert(section);
        self
    }
}

impl Serialize for SettingsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            match section {
                Section::Hooks(table) => map.serialize_entry(HOOKS_KEY, table)?,
                Section::Permissions(permissions) => {
                    map.serialize_entry(PERMISSIONS_KEY, permissions)?;
                }
                Section::Other(entry) => map.serialize_entry(&entry.key, &entry.value)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SettingsDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// Visitor reading top-level keys in file order.
struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = SettingsDocument;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str("a settings object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut document = SettingsDocument::new();
        while let Some(key) = access.next_key::<String>()? {
            let section = if key == HOOKS_KEY {
                Section::Hooks(access.next_value()?)
            } else if key == PERMISSIONS_KEY {
                Section::Permissions(access.next_value()?)
            } else {
                Section::Other(Passthrough {
                    value: access.next_value()?,
                    key,
                })
            };
            document.insert(section);
        }
        Ok(document)
    }
}

/// Hook wiring keyed by hook type (`PreToolUse`, `PostToolUse`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookTable {
    /// Hook types in key order, each with its matcher groups.
    events: Vec<(String, Vec<MatcherGroup>)>,
}

impl HookTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return true when no hook type is present.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate hook types and their groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MatcherGroup])> {
        self.events
            .iter()
            .map(|(event, groups)| (event.as_str(), groups.as_slice()))
    }

    /// Return the groups registered for a hook type.
    pub fn groups(&self, event: &str) -> Option<&[MatcherGroup]> {
        self.iter()
            .find(|(name, _)| *name == event)
            .map(|(_, groups)| groups)
    }

    /// Set the groups for a hook type, replacing any existing list in place.
    pub fn insert(&mut self, event: impl Into<String>, groups: Vec<MatcherGroup>) {
        let event = event.into();
        match self.events.iter_mut().find(|(name, _)| *name == event) {
            Some((_, existing)) => *existing = groups,
            None => self.events.push((event, groups)),
        }
    }
}

impl Serialize for HookTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.events.len()))?;
        for (event, groups) in &self.events {
            map.serialize_entry(event, groups)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HookTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HookTableVisitor)
    }
}

/// Visitor reading hook types in file order.
struct HookTableVisitor;

impl<'de> Visitor<'de> for HookTableVisitor {
    type Value = HookTable;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str("an object mapping hook types to matcher groups")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = HookTable::new();
        while let Some((event, groups)) = access.next_entry::<String, Vec<MatcherGroup>>()? {
            table.insert(event, groups);
        }
        Ok(table)
    }
}

/// All hook entries that fire on one matcher pattern within a hook type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherGroup {
    /// Tool pattern; absent for hook types that do not match on tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// Entries run for this matcher, in order.
    #[serde(default)]
    pub hooks: Vec<HookEntry>,
    /// Unrecognized fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatcherGroup {
    /// Create a group for a matcher with the given entries.
    pub fn new(matcher: impl Into<String>, hooks: Vec<HookEntry>) -> Self {
        Self {
            matcher: Some(matcher.into()),
            hooks,
            extra: Map::new(),
        }
    }
}

/// A single hook invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    /// Hook type, normally `command`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Shell command to run; the entry's identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Message shown while the hook runs.
    #[serde(
        rename = "statusMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_message: Option<String>,
    /// Unrecognized fields (e.g. `timeout`), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Key used to detect duplicate hook entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryIdentity {
    /// Entries with a command are identified by the command string alone.
    Command(String),
    /// Entries without a command are identified by their full contents.
    Verbatim {
        /// Entry type.
        kind: String,
        /// Status message, if any.
        status_message: Option<String>,
        /// Remaining fields rendered as JSON.
        extra: String,
    },
}

impl HookEntry {
    /// Create a `command` entry.
    pub fn command(command: impl Into<String>, status_message: impl Into<String>) -> Self {
        Self {
            kind: COMMAND_HOOK_TYPE.to_string(),
            command: Some(command.into()),
            status_message: Some(status_message.into()),
            extra: Map::new(),
        }
    }

    /// Return the key this entry is deduplicated by.
    pub fn identity(&self) -> EntryIdentity {
        match &self.command {
            Some(command) => EntryIdentity::Command(command.clone()),
            None => EntryIdentity::Verbatim {
                kind: self.kind.clone(),
                status_message: self.status_message.clone(),
                extra: sorted_keys(&Value::Object(self.extra.clone())).to_string(),
            },
        }
    }
}

/// Copy a value with every object's keys in sorted order.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries = map.iter().collect::<Vec<_>>();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

/// Permission rules for tool use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    /// Rules that are allowed without asking.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Rules that are always refused.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Rules that always prompt.
    #[serde(default)]
    pub ask: Vec<String>,
    /// Other permission settings (e.g. `defaultMode`), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Permissions {
    /// Create a rule set that only allows the given rules.
    pub fn allowing(allow: Vec<String>) -> Self {
        Self {
            allow,
            ..Self::default()
        }
    }
}
