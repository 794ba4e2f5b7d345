use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::{find_project_root, CodeSnapError};
use crate::models::Prompt;
use crate::service::SnapshotService;

pub fn run(
    prompt_text: Option<&str>,
    description: &str,
    tags: Vec<String>,
) -> Result<(), CodeSnapError> {
    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    let prompt = prompt_text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Prompt::with_tags(t, tags.clone()));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Snapshotting project...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = service.create_checkpoint(description, tags, prompt);
    spinner.finish_and_clear();

    let checkpoint = result?;
    println!(
        "Checkpoint {} created ({} files): {}",
        checkpoint.id,
        checkpoint.file_snapshots.len(),
        checkpoint.name()
    );
    Ok(())
}
