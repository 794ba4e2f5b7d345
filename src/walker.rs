use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CodeSnapError;

/// Enumerates project files honoring ignore rules and reads their contents
/// with a size cap. Non-UTF-8, oversized and unreadable files are treated
/// as absent rather than as errors.
#[derive(Debug, Clone)]
pub struct ProjectWalker {
    project_root: PathBuf,
    ignore_tokens: BTreeSet<String>,
    include_gitignore: bool,
    max_file_size: u64,
}

impl ProjectWalker {
    pub fn new(project_root: &Path, config: &Config) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            ignore_tokens: config.ignore_tokens(),
            include_gitignore: config.include_gitignore,
            max_file_size: config.max_file_size,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Recursively list all non-ignored files under `root` (default: the
    /// project root). Directories whose final component is an ignore token
    /// are not descended into. Output is sorted.
    pub fn enumerate(&self, root: Option<&Path>) -> Result<Vec<PathBuf>, CodeSnapError> {
        let scan_root = root.unwrap_or(&self.project_root);

        let mut builder = ignore::WalkBuilder::new(scan_root);
        builder
            .hidden(false) // don't skip dotfiles by default
            .git_global(false)
            .git_exclude(false);

        if self.include_gitignore {
            // Treat .gitignore as a custom ignore filename so it works even
            // without a .git/ directory (the ignore crate requires .git/
            // for its git_ignore support).
            builder.git_ignore(true);
            builder.add_custom_ignore_filename(".gitignore");
        } else {
            builder.git_ignore(false);
        }

        let tokens = self.ignore_tokens.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !tokens.contains(name.as_ref())
        });

        let mut paths = Vec::new();
        for entry in builder.build() {
            // Unreadable directory entries are skipped, not fatal.
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry.path().is_file() {
                continue;
            }
            paths.push(entry.path().to_path_buf());
        }

        paths.sort();
        Ok(paths)
    }

    /// Read a file's content. Returns `None` if the file does not exist, is
    /// larger than the configured cap, or is not valid UTF-8. Per-file I/O
    /// errors degrade to `None` and never abort enumeration.
    pub fn read(&self, path: &Path) -> Option<String> {
        let meta = fs::metadata(path).ok()?;
        if !meta.is_file() || meta.len() > self.max_file_size {
            return None;
        }
        let bytes = fs::read(path).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Relative POSIX-style path of `path` under `root`.
    pub fn relative_path(root: &Path, path: &Path) -> Result<String, CodeSnapError> {
        let rel = path.strip_prefix(root).map_err(|e| {
            CodeSnapError::FileService(format!(
                "{} is outside {}: {}",
                path.display(),
                root.display(),
                e
            ))
        })?;
        // Normalize to forward slashes for cross-platform consistency.
        Ok(rel.to_string_lossy().replace('\\', "/"))
    }
}
