//! Unified diff previews of settings changes.

use owo_colors::OwoColorize;
use similar::TextDiff;

/// Header label used when the settings file does not exist yet.
const MISSING_FILE_LABEL: &str = "/dev/null";

/// Render the diff between the current settings text and its replacement.
///
/// A missing file diffs against `/dev/null`, so a new file shows as all
/// additions. Returns an empty string when nothing changes.
pub fn settings_diff(label: &str, before: Option<&str>, after: &str, color: bool) -> String {
    let old_label = if before.is_some() {
        label
    } else {
        MISSING_FILE_LABEL
    };
    let diff = TextDiff::from_lines(before.unwrap_or(""), after)
        .unified_diff()
        .context_radius(3)
        .header(old_label, label)
        .to_string();

    if !color {
        return diff;
    }
    diff.lines()
        .map(|line| format!("{}\n", paint_line(line)))
        .collect()
}

/// Color one diff line by its marker.
fn paint_line(line: &str) -> String {
    match line.as_bytes().first() {
        _ if line.starts_with("+++") || line.starts_with("---") => line.bold().to_string(),
        Some(b'@') => line.cyan().to_string(),
        Some(b'+') => line.green().to_string(),
        Some(b'-') => line.red().to_string(),
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::settings_diff;

    #[test]
    fn new_file_diffs_against_dev_null() {
        let diff = settings_diff("settings.local.json", None, "{}\n", false);
        assert!(diff.starts_with("--- /dev/null\n+++ settings.local.json\n"));
        assert!(diff.contains("+{}"));
    }

    #[test]
    fn shows_changed_lines() {
        let diff = settings_diff(
            "settings.local.json",
            Some("{\n  \"model\": \"sonnet\"\n}\n"),
            "{\n  \"model\": \"opus\"\n}\n",
            false,
        );
        assert!(diff.contains("-  \"model\": \"sonnet\""));
        assert!(diff.contains("+  \"model\": \"opus\""));
    }

    #[test]
    fn empty_when_unchanged() {
        assert!(settings_diff("s", Some("same\n"), "same\n", false).is_empty());
    }

    #[test]
    fn colored_output_keeps_every_line() {
        let plain = settings_diff("s", None, "a\nb\n", false);
        let colored = settings_diff("s", None, "a\nb\n", true);
        assert_eq!(plain.lines().count(), colored.lines().count());
    }
}
