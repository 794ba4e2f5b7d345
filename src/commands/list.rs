use crate::config::Config;
use crate::error::{find_project_root, CodeSnapError};
use crate::service::SnapshotService;

pub fn run() -> Result<(), CodeSnapError> {
    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    let checkpoints = service.checkpoint_store().list()?;
    if checkpoints.is_empty() {
        println!("No checkpoints found.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<40}  {:<19}  {:>5}  {}",
        "ID", "Name", "Timestamp", "Files", "Tags"
    );
    for checkpoint in &checkpoints {
        let mut name = checkpoint.name();
        if checkpoint.is_restore() {
            name = format!("[restore] {name}");
        }
        println!(
            "{:>4}  {:<40}  {:<19}  {:>5}  {}",
            checkpoint.id,
            name,
            checkpoint.timestamp.format("%Y-%m-%d %H:%M:%S"),
            checkpoint.file_snapshots.len(),
            checkpoint.tags.join(", ")
        );
        if !checkpoint.description.is_empty() {
            println!("      {}", truncate(&checkpoint.description, 70));
        }
    }

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let shortened: String = text.chars().take(max).collect();
        format!("{shortened}...")
    } else {
        text.to_string()
    }
}
