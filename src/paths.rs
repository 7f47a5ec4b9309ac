//! Path expansion and normalization utilities.

use std::{
    env,
    path::{MAIN_SEPARATOR, Path, PathBuf},
};

use path_clean::PathClean;

use crate::error::{Error, Result};

/// Project-level configuration directory that items are installed into.
pub const CLAUDE_DIR: &str = ".claude";

/// Return the default config path for the current platform.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::HomeDirMissing)?;
    Ok(home.join(".claudekit.toml"))
}

/// Expand a config-provided path and resolve it relative to a base directory.
pub fn expand_path(raw: &str, base_dir: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|error| Error::PathExpansion {
        path: raw.to_string(),
        source: error,
    })?;
    Ok(resolve_against(Path::new(expanded.as_ref()), base_dir))
}

/// Resolve a command-line path against the current directory.
pub fn resolve_cli_path(path: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|source| Error::CurrentDir { source })?;
    Ok(match path {
        Some(path) => resolve_against(&path, &cwd),
        None => normalize_path(&cwd),
    })
}

/// Join a relative path onto a base directory and normalize the result.
fn resolve_against(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_relative() {
        normalize_path(&base_dir.join(path))
    } else {
        normalize_path(path)
    }
}

/// Normalize a path for comparisons by cleaning and canonicalizing when possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => path.clean(),
    }
}

/// Render a path for display, using a tilde prefix for the home directory.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{expand_path, normalize_path};

    #[test]
    fn resolves_relative_paths_against_base() {
        let dir = tempdir().expect("tempdir");
        let resolved = expand_path("tooling/../tooling", dir.path()).expect("expand");
        assert_eq!(resolved, normalize_path(dir.path()).join("tooling"));
    }

    #[test]
    fn keeps_absolute_paths() {
        let dir = tempdir().expect("tempdir");
        let absolute = dir.path().to_string_lossy().to_string();
        let resolved = expand_path(&absolute, &dir.path().join("elsewhere")).expect("expand");
        assert_eq!(resolved, normalize_path(dir.path()));
    }
}
