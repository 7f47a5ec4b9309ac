//! Color palette and styling for CLI output.

use owo_colors::{OwoColorize, Style};

/// Style for item names - the primary identifier, visually prominent.
pub fn item_name() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings like "Available Hooks".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "Tags:" or "Updated:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for description text - readable but subdued.
pub fn description() -> Style {
    Style::new().dimmed()
}

/// Style for path values.
pub fn path() -> Style {
    Style::new().white()
}

/// Style for bracketed tags like "[haiku]".
pub fn tag() -> Style {
    Style::new().dimmed()
}

/// Style for successful outcomes.
pub fn success() -> Style {
    Style::new().green()
}

/// Apply a style when color is enabled.
fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format an item name with styling.
pub fn fmt_item_name(name: &str, use_color: bool) -> String {
    paint(name, item_name(), use_color)
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    paint(text, heading(), use_color)
}

/// Format a label with styling.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    paint(text, label(), use_color)
}

/// Format description text with styling.
pub fn fmt_description(text: &str, use_color: bool) -> String {
    paint(text, description(), use_color)
}

/// Format a path with styling.
pub fn fmt_path(text: &str, use_color: bool) -> String {
    paint(text, path(), use_color)
}

/// Format a tag with styling.
pub fn fmt_tag(text: &str, use_color: bool) -> String {
    paint(text, tag(), use_color)
}

/// Format a success message with styling.
pub fn fmt_success(text: &str, use_color: bool) -> String {
    paint(text, success(), use_color)
}
