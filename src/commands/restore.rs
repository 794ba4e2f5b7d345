use std::path::PathBuf;

use crate::commands::resolve_checkpoint_ref;
use crate::config::Config;
use crate::error::{find_project_root, CodeSnapError};
use crate::service::SnapshotService;

pub fn run(checkpoint_ref: &str, output: Option<&str>, yes: bool) -> Result<(), CodeSnapError> {
    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    let checkpoint_id = resolve_checkpoint_ref(&service, checkpoint_ref)?;
    let Some(checkpoint) = service.checkpoint_store().load(checkpoint_id)? else {
        return Err(CodeSnapError::CheckpointNotFound(checkpoint_ref.to_string()));
    };

    if !yes {
        let message = format!(
            "Restore checkpoint {} ({})? Checkpoints created after it will be deleted.",
            checkpoint_id,
            checkpoint.name()
        );
        let confirmed = inquire::Confirm::new(&message)
            .with_default(false)
            .prompt()
            .map_err(|e| CodeSnapError::Config(format!("prompt cancelled: {e}")))?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let restore_root = output.map(PathBuf::from);
    let restored = service.restore_checkpoint(checkpoint_id, restore_root.as_deref())?;
    if !restored {
        return Err(CodeSnapError::CheckpointNotFound(checkpoint_ref.to_string()));
    }

    println!("Checkpoint '{}' restored.", checkpoint.name());
    match restore_root {
        Some(path) => println!("Files restored to: {}", path.display()),
        None => {
            let marker = service.record_restore(checkpoint_id)?;
            println!("Restore recorded as checkpoint {}.", marker.id);
        }
    }

    Ok(())
}
