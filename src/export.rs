use std::fmt::Write as _;

use crate::service::TimelineEntry;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Html,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "markdown" | "md" => Some(ExportFormat::Markdown),
            "html" => Some(ExportFormat::Html),
            _ => None,
        }
    }
}

fn anchor_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Render the checkpoint timeline as a chronological Markdown narrative:
/// table of contents, then one section per checkpoint with its prompt, tags
/// and per-file diffs against the previous checkpoint.
pub fn render_markdown(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    out.push_str("# CodeSnap Export\n\n");
    out.push_str("## Table of Contents\n\n");

    for (i, entry) in entries.iter().enumerate() {
        let checkpoint = &entry.checkpoint;
        let line = if checkpoint.is_restore() {
            format!(
                "{}. [Restore: {}](#restore-{})\n",
                i + 1,
                checkpoint.name(),
                anchor_slug(&checkpoint.name())
            )
        } else if checkpoint.prompt.is_some() {
            format!(
                "{}. [Checkpoint {}](#checkpoint-{})\n",
                i + 1,
                checkpoint.id,
                checkpoint.id
            )
        } else {
            format!(
                "{}. [Initial: {}](#initial-{})\n",
                i + 1,
                checkpoint.name(),
                anchor_slug(&checkpoint.name())
            )
        };
        out.push_str(&line);
    }
    out.push_str("\n---\n\n");

    for entry in entries {
        let checkpoint = &entry.checkpoint;

        if let Some(prompt) = checkpoint.prompt.as_ref().filter(|_| !checkpoint.is_restore()) {
            let _ = writeln!(
                out,
                "## Checkpoint {} {{#checkpoint-{}}}\n",
                checkpoint.id, checkpoint.id
            );
            if !prompt.content.is_empty() {
                let _ = writeln!(out, "**Prompt:**\n```\n{}\n```", prompt.content);
            }
            if !prompt.tags.is_empty() {
                let _ = writeln!(out, "**Tags:** {}\n", prompt.tags.join(", "));
            }

            if let Some(changes) = &entry.changes {
                out.push_str("### Changes from previous checkpoint\n\n");
                if changes.is_empty() {
                    out.push_str("No changes detected.\n\n");
                } else {
                    for change in changes {
                        let _ = writeln!(
                            out,
                            "**File:** `{}` ({})\n",
                            change.file_path, change.change_type
                        );
                        if !change.diff.is_empty() {
                            let _ = writeln!(out, "```diff\n{}\n```\n", change.diff.trim_end());
                        }
                    }
                }
            }
        }

        if checkpoint.is_restore() {
            let _ = writeln!(
                out,
                "## Restore Operation: {} {{#restore-{}}}\n",
                checkpoint.name(),
                anchor_slug(&checkpoint.name())
            );
            let _ = writeln!(out, "**Description:** {}\n", checkpoint.description);
            if let Some(from) = checkpoint.restored_from {
                let _ = writeln!(out, "**Restored from:** {from}\n");
            }
            if let Some(ts) = checkpoint.restore_timestamp {
                let _ = writeln!(out, "**Restore timestamp:** {ts}\n");
            }
            if !checkpoint.tags.is_empty() {
                let _ = writeln!(out, "**Tags:** {}\n", checkpoint.tags.join(", "));
            }
            out.push_str("---\n\n");
        } else if checkpoint.prompt.is_none() {
            let _ = writeln!(
                out,
                "## Initial Checkpoint: {} {{#initial-{}}}\n",
                checkpoint.name(),
                anchor_slug(&checkpoint.name())
            );
            let _ = writeln!(out, "**Description:** {}\n", checkpoint.description);
            if !checkpoint.tags.is_empty() {
                let _ = writeln!(out, "**Tags:** {}\n", checkpoint.tags.join(", "));
            }
        }
    }

    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
        .replace('"', "&quot;")
}

fn diff_to_html(diff: &str) -> String {
    let mut lines = Vec::new();
    for line in diff.lines() {
        let escaped = escape_html(line);
        if line.starts_with('+') {
            lines.push(format!("<span style=\"color: green;\">{escaped}</span>"));
        } else if line.starts_with('-') {
            lines.push(format!("<span style=\"color: red;\">{escaped}</span>"));
        } else if line.starts_with('@') {
            lines.push(format!("<span style=\"color: cyan;\">{escaped}</span>"));
        } else {
            lines.push(escaped);
        }
    }
    lines.join("\n")
}

const HTML_STYLE: &str = "<style>
body { font-family: sans-serif; line-height: 1.6; margin: 2em; }
h1, h2, h3, h4 { color: #333; }
pre { background: #f4f4f4; padding: 1em; border-radius: 5px; white-space: pre-wrap; word-wrap: break-word; }
code { font-family: monospace; background: #eee; padding: 0.2em 0.4em; border-radius: 3px; }
hr { border: 0; border-top: 1px solid #ddd; margin: 2em 0; }
</style>";

/// Render the checkpoint timeline as a standalone HTML document with
/// color-coded diffs.
pub fn render_html(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><title>CodeSnap Export</title>");
    out.push_str(HTML_STYLE);
    out.push_str("</head><body>");
    out.push_str("<h1>CodeSnap Export</h1>");
    out.push_str("<h2>Table of Contents</h2>");

    out.push_str("<ol>");
    for entry in entries {
        let checkpoint = &entry.checkpoint;
        if checkpoint.is_restore() {
            let _ = write!(
                out,
                "<li><a href=\"#restore-{}\">Restore: {}</a></li>",
                anchor_slug(&checkpoint.name()),
                escape_html(&checkpoint.name())
            );
        } else if checkpoint.prompt.is_some() {
            let _ = write!(
                out,
                "<li><a href=\"#checkpoint-{}\">Checkpoint {}</a></li>",
                checkpoint.id, checkpoint.id
            );
        } else {
            let _ = write!(
                out,
                "<li><a href=\"#initial-{}\">Initial: {}</a></li>",
                anchor_slug(&checkpoint.name()),
                escape_html(&checkpoint.name())
            );
        }
    }
    out.push_str("</ol><hr>");

    for entry in entries {
        let checkpoint = &entry.checkpoint;

        if let Some(prompt) = checkpoint.prompt.as_ref().filter(|_| !checkpoint.is_restore()) {
            let _ = write!(
                out,
                "<h2 id=\"checkpoint-{}\">Checkpoint {}</h2>",
                checkpoint.id, checkpoint.id
            );
            if !prompt.content.is_empty() {
                let _ = write!(
                    out,
                    "<p><strong>Prompt:</strong></p><pre><code>{}</code></pre>",
                    escape_html(&prompt.content)
                );
            }
            if !prompt.tags.is_empty() {
                let _ = write!(
                    out,
                    "<p><strong>Tags:</strong> {}</p>",
                    escape_html(&prompt.tags.join(", "))
                );
            }

            if let Some(changes) = &entry.changes {
                out.push_str("<h3>Changes from previous checkpoint</h3>");
                if changes.is_empty() {
                    out.push_str("<p>No changes detected.</p>");
                } else {
                    for change in changes {
                        let _ = write!(
                            out,
                            "<p><strong>File:</strong> <code>{}</code> ({})</p>",
                            escape_html(&change.file_path),
                            change.change_type
                        );
                        if !change.diff.is_empty() {
                            let _ = write!(out, "<pre>{}</pre>", diff_to_html(&change.diff));
                        }
                    }
                }
            }
        }

        if checkpoint.is_restore() {
            let _ = write!(
                out,
                "<h2 id=\"restore-{}\">Restore Operation: {}</h2>",
                anchor_slug(&checkpoint.name()),
                escape_html(&checkpoint.name())
            );
            let _ = write!(
                out,
                "<p><strong>Description:</strong> {}</p>",
                escape_html(&checkpoint.description)
            );
            if let Some(from) = checkpoint.restored_from {
                let _ = write!(out, "<p><strong>Restored from:</strong> {from}</p>");
            }
            if let Some(ts) = checkpoint.restore_timestamp {
                let _ = write!(out, "<p><strong>Restore timestamp:</strong> {ts}</p>");
            }
            out.push_str("<hr>");
        } else if checkpoint.prompt.is_none() {
            let _ = write!(
                out,
                "<h2 id=\"initial-{}\">Initial Checkpoint: {}</h2>",
                anchor_slug(&checkpoint.name()),
                escape_html(&checkpoint.name())
            );
            let _ = write!(
                out,
                "<p><strong>Description:</strong> {}</p>",
                escape_html(&checkpoint.description)
            );
            if !checkpoint.tags.is_empty() {
                let _ = write!(
                    out,
                    "<p><strong>Tags:</strong> {}</p>",
                    escape_html(&checkpoint.tags.join(", "))
                );
            }
        }
    }

    out.push_str("</body></html>");
    out
}
