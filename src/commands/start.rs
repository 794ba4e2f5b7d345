use std::io::BufRead;

use inquire::InquireError;

use crate::config::Config;
use crate::error::{find_project_root, CodeSnapError};
use crate::models::Prompt;
use crate::service::SnapshotService;

pub fn run(tags: &[String], description: &str) -> Result<(), CodeSnapError> {
    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    println!("codesnap interactive session");

    let existing = service.checkpoint_store().list()?;
    if existing.is_empty() {
        println!("No existing checkpoints found. Creating initial checkpoint...");
        let initial =
            service.create_initial_checkpoint("Initial checkpoint before any changes")?;
        println!("Initial checkpoint created: {}", initial.id);
    } else {
        println!("Found {} existing checkpoint(s).", existing.len());
    }

    println!("Enter prompts to create checkpoints. Type 'exit' or press Ctrl+C to quit.\n");

    loop {
        let text = match inquire::Text::new("Prompt:").prompt() {
            Ok(text) => text,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                println!("Exiting session.");
                break;
            }
            Err(e) => return Err(CodeSnapError::Config(format!("prompt failed: {e}"))),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            println!("Prompt cannot be empty. Try again.");
            continue;
        }
        if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Exiting session.");
            break;
        }

        // Snapshot AFTER the edits the prompt drove, not before.
        println!("Make your code changes, then press Enter to create a checkpoint...");
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;

        let prompt = Prompt::with_tags(trimmed, tags.to_vec());
        match service.create_checkpoint(description, tags.to_vec(), Some(prompt)) {
            Ok(checkpoint) => println!(
                "Checkpoint {} created ({} files): {}",
                checkpoint.id,
                checkpoint.file_snapshots.len(),
                checkpoint.name()
            ),
            Err(e) => {
                println!("Error: {e}");
                continue;
            }
        }
    }

    Ok(())
}
