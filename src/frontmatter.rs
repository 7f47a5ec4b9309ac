//! Frontmatter parsing for agent, command and skill markdown files.

use serde::Deserialize;

/// Metadata fields read from a markdown file's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Declared item name.
    pub name: Option<String>,
    /// Declared description.
    pub description: Option<String>,
    /// Preferred model for agents.
    pub model: Option<String>,
}

/// Raw frontmatter fields as YAML.
#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    /// Declared item name.
    name: Option<String>,
    /// Declared description.
    description: Option<String>,
    /// Preferred model for agents.
    model: Option<String>,
}

/// A markdown document split into metadata and body.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Parsed metadata; empty when the file has no frontmatter.
    pub frontmatter: Frontmatter,
    /// Text after the closing `---`, or the whole file.
    pub body: String,
}

/// Split a markdown file into frontmatter and body.
///
/// Frontmatter is read as YAML. Agent descriptions often contain text that is
/// not valid YAML (unquoted colons, inline examples), so when YAML parsing
/// fails each `key: value` line is read literally instead.
pub fn parse_document(contents: &str) -> Document {
    let Some(bounds) = frontmatter_bounds(contents) else {
        return Document {
            frontmatter: Frontmatter::default(),
            body: contents.to_string(),
        };
    };

    let yaml = &contents[bounds.start..bounds.end];
    let frontmatter = match serde_yaml::from_str::<Option<RawFrontmatter>>(yaml) {
        Ok(raw) => {
            let raw = raw.unwrap_or_default();
            Frontmatter {
                name: clean(raw.name),
                description: clean(raw.description),
                model: clean(raw.model),
            }
        }
        Err(_) => parse_lines(yaml),
    };

    Document {
        frontmatter,
        body: contents[bounds.body..].to_string(),
    }
}

/// Read `key: value` lines without interpreting YAML syntax.
fn parse_lines(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = clean(Some(value.to_string()));
        match key.trim() {
            "name" => frontmatter.name = value,
            "description" => frontmatter.description = value,
            "model" => frontmatter.model = value,
            _ => {}
        }
    }
    frontmatter
}

/// Trim a field, treating blank values as absent.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Byte offsets of frontmatter in a document.
#[derive(Debug, Clone, Copy)]
struct FrontmatterBounds {
    /// Start byte index of the YAML payload.
    start: usize,
    /// End byte index of the YAML payload.
    end: usize,
    /// Start byte index of the body after the closing fence.
    body: usize,
}

/// Locate the byte range containing frontmatter in a document.
fn frontmatter_bounds(contents: &str) -> Option<FrontmatterBounds> {
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line_endings(first) != "---" {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        if trim_line_endings(line) == "---" {
            return Some(FrontmatterBounds {
                start,
                end: offset,
                body: offset + line.len(),
            });
        }
        offset += line.len();
    }

    None
}

/// Trim CRLF and LF suffixes from a line fragment.
fn trim_line_endings(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
