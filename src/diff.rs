use serde::{Deserialize, Serialize};
use similar::TextDiff;

/// Styling category of one line of a unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    Added,
    Removed,
    Header,
    Context,
}

/// One line of a unified diff plus its styling hint. The text is the exact
/// payload line, prefix included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
}

/// Generate a unified diff between two content strings.
///
/// Classic format: `--- old` / `+++ new` headers, `@@` hunk headers, body
/// lines prefixed with ` `, `+` or `-`, three lines of context. Identical
/// inputs yield the empty string.
pub fn generate_diff(old_content: &str, new_content: &str) -> String {
    if old_content == new_content {
        return String::new();
    }

    let diff = TextDiff::from_lines(old_content, new_content);
    let mut udiff = diff.unified_diff();
    udiff.context_radius(3).header("old", "new").to_string()
}

/// Generate the same diff as [`generate_diff`] with per-line styling hints.
/// The textual payload is identical; the annotation is out of band.
pub fn generate_diff_styled(old_content: &str, new_content: &str) -> Vec<DiffLine> {
    let payload = generate_diff(old_content, new_content);
    if payload.is_empty() {
        return Vec::new();
    }

    payload
        .lines()
        .map(|line| {
            let kind = if line.starts_with("+++") || line.starts_with("---") || line.starts_with("@@")
            {
                DiffLineKind::Header
            } else if line.starts_with('+') {
                DiffLineKind::Added
            } else if line.starts_with('-') {
                DiffLineKind::Removed
            } else {
                DiffLineKind::Context
            };
            DiffLine {
                kind,
                text: line.to_string(),
            }
        })
        .collect()
}
