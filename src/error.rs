use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeSnapError {
    #[error("not a codesnap project (no .codesnap/ directory found)")]
    NotInitialized,

    #[error("checkpoint not found: {0}")]
    CheckpointNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("file service error: {0}")]
    FileService(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("failed to create checkpoint: {0}")]
    Checkpoint(String, #[source] Box<CodeSnapError>),

    #[error("comparison failed: {0}")]
    Comparison(String),

    #[error("restore failed: {0}")]
    Restore(String, #[source] Box<CodeSnapError>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CodeSnapError {
    /// Wrap an error as the cause of a failed `create_checkpoint`.
    pub fn checkpoint(message: impl Into<String>, source: CodeSnapError) -> Self {
        CodeSnapError::Checkpoint(message.into(), Box::new(source))
    }

    /// Wrap an error as the cause of a failed `restore_checkpoint`.
    pub fn restore(message: impl Into<String>, source: CodeSnapError) -> Self {
        CodeSnapError::Restore(message.into(), Box::new(source))
    }
}

/// Find the project root by searching for `.codesnap/` starting from the
/// current directory and walking up. Returns the directory containing
/// `.codesnap/`.
pub fn find_project_root() -> Result<PathBuf, CodeSnapError> {
    let mut dir = std::env::current_dir()?;
    loop {
        if dir.join(".codesnap").is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(CodeSnapError::NotInitialized);
        }
    }
}
