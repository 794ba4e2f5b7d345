use std::fs;

use crate::config::Config;
use crate::error::{find_project_root, CodeSnapError};
use crate::export::{render_html, render_markdown, ExportFormat};
use crate::service::SnapshotService;

pub fn run(output: &str, format: &str) -> Result<(), CodeSnapError> {
    let format = ExportFormat::parse(format)
        .ok_or_else(|| CodeSnapError::Config(format!("unsupported export format: {format}")))?;

    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    let entries = service.timeline()?;
    let rendered = match format {
        ExportFormat::Markdown => render_markdown(&entries),
        ExportFormat::Html => render_html(&entries),
    };
    fs::write(output, rendered)?;

    println!("Exported {} checkpoint(s) to {output}", entries.len());
    Ok(())
}
