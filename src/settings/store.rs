//! Reading, merging and atomically writing the project settings file.

use std::{
    fs,
    io::{ErrorKind, Write},
    iter,
    path::{Path, PathBuf},
};

use tempfile::Builder;

use crate::{
    error::{Error, Result},
    paths::CLAUDE_DIR,
    settings::{document::SettingsDocument, merge::merge},
};

/// File name of the project-local settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.local.json";

/// Return the settings path for a target project.
pub fn settings_path(target: &Path) -> PathBuf {
    target.join(CLAUDE_DIR).join(SETTINGS_FILE_NAME)
}

/// A computed settings change, not yet written.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    /// Settings file being updated.
    pub(crate) path: PathBuf,
    /// Current file contents, if the file exists.
    pub(crate) before: Option<String>,
    /// Rendered merged document.
    pub(crate) after: String,
}

impl SettingsUpdate {
    /// Whether writing the update would change the file.
    pub(crate) fn changed(&self) -> bool {
        self.before.as_deref() != Some(self.after.as_str())
    }
}

/// A settings file as read from disk.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    /// Location of the file.
    path: PathBuf,
    /// Raw contents, absent when the file does not exist.
    contents: Option<String>,
    /// Parsed document; empty when the file does not exist.
    document: SettingsDocument,
}

impl SettingsFile {
    /// Read and parse the file, treating a missing file as empty.
    ///
    /// A malformed file is an error naming the path.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                return Err(Error::SettingsRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };
        let document = match &contents {
            Some(contents) => {
                SettingsDocument::from_json_str(contents).map_err(|error| Error::SettingsParse {
                    path: path.to_path_buf(),
                    source: error,
                })?
            }
            None => SettingsDocument::new(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            contents,
            document,
        })
    }

    /// Return the parsed document.
    pub fn document(&self) -> &SettingsDocument {
        &self.document
    }

    /// Merge fragments into this file's document.
    ///
    /// Returns `None` when every fragment is empty, so installs that touch no
    /// settings leave the file alone.
    pub fn plan(&self, fragments: &[SettingsDocument]) -> Result<Option<SettingsUpdate>> {
        if fragments.iter().all(SettingsDocument::is_empty) {
            return Ok(None);
        }

        let merged = merge(iter::once(&self.document).chain(fragments));
        let after = merged
            .to_json_pretty()
            .map_err(|source| Error::SettingsSerialize { source })?;

        Ok(Some(SettingsUpdate {
            path: self.path.clone(),
            before: self.contents.clone(),
            after,
        }))
    }
}

/// Load the settings document, treating a missing file as empty.
pub fn load(path: &Path) -> Result<SettingsDocument> {
    Ok(SettingsFile::read(path)?.document)
}

/// Read the persisted document and merge fragments into it.
///
/// The file is not read when every fragment is empty.
pub fn plan_update(path: &Path, fragments: &[SettingsDocument]) -> Result<Option<SettingsUpdate>> {
    if fragments.iter().all(SettingsDocument::is_empty) {
        return Ok(None);
    }
    SettingsFile::read(path)?.plan(fragments)
}

/// Write an update through a temporary file that replaces the target.
pub fn apply(update: &SettingsUpdate) -> Result<()> {
    save(&update.path, &update.after)
}

/// Atomically replace the file at `path` with `contents`.
///
/// An existing file keeps its permissions. A new file gets the mode a plain
/// create would give it under the process umask.
pub fn save(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(|error| Error::CreateDir {
        path: parent.to_path_buf(),
        source: error,
    })?;

    let write_error = |source| Error::SettingsWrite {
        path: path.to_path_buf(),
        source,
    };
    let existing = fs::metadata(path).ok().map(|metadata| metadata.permissions());

    let mut builder = Builder::new();
    if existing.is_none()
        && let Some(permissions) = new_file_permissions()
    {
        builder.permissions(permissions);
    }
    let mut file = builder.tempfile_in(parent).map_err(write_error)?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions).map_err(write_error)?;
    }
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path)
        .map_err(|error| write_error(error.error))?;
    Ok(())
}

/// Creation mode for a new settings file, narrowed by the umask on open.
#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(fs::Permissions::from_mode(0o666))
}

/// Other platforms keep the temporary file's default permissions.
#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    use super::{SettingsFile, apply, load, plan_update, save, settings_path};
    use crate::{error::Error, settings::document::SettingsDocument};

    fn fragment(value: serde_json::Value) -> SettingsDocument {
        serde_json::from_value(value).expect("fragment")
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let document = load(&settings_path(dir.path())).expect("load");
        assert!(document.is_empty());
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        save(&path, "{ not json").expect("save");

        let error = plan_update(
            &path,
            &[fragment(json!({"permissions": {"allow": ["A"]}}))],
        )
        .expect_err("should fail");
        assert!(matches!(error, Error::SettingsParse { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), "{ not json");
    }

    #[test]
    fn skips_when_fragments_are_empty() {
        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        let update = plan_update(&path, &[SettingsDocument::new()]).expect("plan");
        assert!(update.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn writes_pretty_json_with_trailing_newline() {
        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        let update = plan_update(&path, &[fragment(json!({"permissions": {"allow": ["A"]}}))])
            .expect("plan")
            .expect("update");
        assert!(update.changed());
        apply(&update).expect("apply");

        let written = fs::read_to_string(&path).expect("read");
        assert_eq!(
            written,
            "{\n  \"permissions\": {\n    \"allow\": [\n      \"A\"\n    ],\n    \"deny\": [],\n    \"ask\": []\n  }\n}\n"
        );
    }

    #[test]
    fn repeated_update_is_unchanged() {
        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        let fragments = [fragment(json!({
            "hooks": {"PreToolUse": [{"matcher": "Bash", "hooks": [
                {"type": "command", "command": "python3 .claude/hooks/guard.py", "statusMessage": "Guard"}
            ]}]}
        }))];

        let first = plan_update(&path, &fragments).expect("plan").expect("update");
        apply(&first).expect("apply");
        let second = plan_update(&path, &fragments).expect("plan").expect("update");
        assert!(!second.changed());
        assert_eq!(second.after, first.after);
    }

    #[test]
    fn preserves_existing_passthrough_keys() {
        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        save(&path, "{\n  \"model\": \"opus\"\n}\n").expect("save");

        let update = plan_update(&path, &[fragment(json!({"permissions": {"allow": ["A"]}}))])
            .expect("plan")
            .expect("update");
        assert!(update.after.starts_with("{\n  \"model\": \"opus\",\n  \"permissions\""));
    }

    #[test]
    fn plans_from_the_contents_read_up_front() {
        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        save(&path, "{\n  \"model\": \"opus\"\n}\n").expect("save");

        let file = SettingsFile::read(&path).expect("read");
        assert_eq!(file.document().get("model"), Some(&json!("opus")));
        fs::write(&path, "{ not json").expect("overwrite");

        let update = file
            .plan(&[fragment(json!({"permissions": {"allow": ["A"]}}))])
            .expect("plan")
            .expect("update");
        assert_eq!(update.before.as_deref(), Some("{\n  \"model\": \"opus\"\n}\n"));
        assert!(update.after.contains("\"model\": \"opus\""));
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let path = settings_path(dir.path());
        for mode in [0o644, 0o640] {
            save(&path, "{}\n").expect("save");
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");

            save(&path, "{\"model\": \"opus\"}\n").expect("save");
            let saved = fs::metadata(&path).expect("metadata").permissions().mode();
            assert_eq!(saved & 0o777, mode);
        }
    }

    #[cfg(unix)]
    #[test]
    fn new_file_gets_umask_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let plain = dir.path().join("plain.json");
        fs::write(&plain, "{}\n").expect("write");
        let path = settings_path(dir.path());

        save(&path, "{}\n").expect("save");
        let expected = fs::metadata(&plain).expect("metadata").permissions().mode();
        let saved = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(saved & 0o777, expected & 0o777);
    }
}
