use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::CodeSnapError;

/// Path components that are never snapshotted, whatever the config says.
/// `.codesnap` itself is always in this set so the store can't snapshot
/// or restore over itself.
pub const DEFAULT_IGNORE_TOKENS: &[&str] = &[
    ".git",
    ".codesnap",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "node_modules",
    "target",
    ".venv",
    "venv",
    "env",
    ".idea",
    ".vscode",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extra literal path-component tokens to ignore, on top of the defaults.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Whether patterns from `<project_root>/.gitignore` also exclude files.
    #[serde(default = "default_include_gitignore")]
    pub include_gitignore: bool,

    /// Files larger than this many bytes are skipped when snapshotting.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_include_gitignore() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            include_gitignore: default_include_gitignore(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    /// Load config from `.codesnap/config.yml` relative to the project root.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(project_root: &Path) -> Result<Self, CodeSnapError> {
        let path = project_root.join(".codesnap/config.yml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CodeSnapError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Write config to `.codesnap/config.yml`.
    pub fn save(&self, project_root: &Path) -> Result<(), CodeSnapError> {
        let path = project_root.join(".codesnap/config.yml");
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// The full set of literal ignore tokens: defaults plus configured extras.
    pub fn ignore_tokens(&self) -> BTreeSet<String> {
        let mut tokens: BTreeSet<String> = DEFAULT_IGNORE_TOKENS
            .iter()
            .map(|t| t.to_string())
            .collect();
        tokens.extend(self.ignore_patterns.iter().cloned());
        tokens
    }
}
