pub mod diff;
pub mod export;
pub mod init;
pub mod list;
pub mod restore;
pub mod save;
pub mod start;
pub mod status;

use crate::error::CodeSnapError;
use crate::service::SnapshotService;

/// Resolve a checkpoint reference (integer id or display name) to an id.
pub(crate) fn resolve_checkpoint_ref(
    service: &SnapshotService,
    reference: &str,
) -> Result<u64, CodeSnapError> {
    if let Ok(id) = reference.parse::<u64>() {
        if service.checkpoint_store().load(id)?.is_some() {
            return Ok(id);
        }
    }

    for checkpoint in service.checkpoint_store().list()? {
        if checkpoint.name() == reference {
            return Ok(checkpoint.id);
        }
    }

    Err(CodeSnapError::CheckpointNotFound(reference.to_string()))
}
