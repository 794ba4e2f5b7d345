use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::DiffLine;

/// A prompt captured alongside a checkpoint, recording the instruction that
/// drove an AI editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Prompt {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: Utc::now(),
            tags: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_tags(content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            tags,
            ..Self::new(content)
        }
    }
}

/// A snapshot of the project tree at a point in time plus metadata.
///
/// `file_snapshots` maps relative POSIX-style paths to blob addresses in the
/// content store. A `BTreeMap` keeps the on-disk serialization sorted and
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub prompt: Option<Prompt>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub file_snapshots: BTreeMap<String, String>,
    #[serde(default)]
    pub restored_from: Option<u64>,
    #[serde(default)]
    pub restore_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Checkpoint {
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            timestamp: Utc::now(),
            prompt: None,
            tags: Vec::new(),
            file_snapshots: BTreeMap::new(),
            restored_from: None,
            restore_timestamp: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Display name: the first 50 characters of the prompt content
    /// ("..." appended when truncated), or "Checkpoint <id>" when there is
    /// no prompt. Derived, never persisted.
    pub fn name(&self) -> String {
        match &self.prompt {
            Some(prompt) if !prompt.content.is_empty() => {
                let truncated: String = prompt.content.chars().take(50).collect();
                if prompt.content.chars().count() > 50 {
                    format!("{truncated}...")
                } else {
                    truncated
                }
            }
            _ => format!("Checkpoint {}", self.id),
        }
    }

    /// A restore checkpoint records that a restore operation happened.
    pub fn is_restore(&self) -> bool {
        self.restored_from.is_some()
    }
}

/// How a file differs between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file's difference between two snapshots (or a snapshot and the live
/// tree). `styled` carries the annotated variant of `diff` when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeChange {
    pub file_path: String,
    pub change_type: ChangeType,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
    pub diff: String,
    pub styled: Option<Vec<DiffLine>>,
}
