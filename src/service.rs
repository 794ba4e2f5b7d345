use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;

use crate::config::Config;
use crate::diff::{generate_diff, generate_diff_styled};
use crate::error::CodeSnapError;
use crate::models::{ChangeType, Checkpoint, CodeChange, Prompt};
use crate::storage::{CheckpointStore, ContentStore};
use crate::walker::ProjectWalker;

/// One step of the chronological export iteration. `changes` is present for
/// prompted, non-restore checkpoints that have a preceding non-restore
/// checkpoint to diff against.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub checkpoint: Checkpoint,
    pub changes: Option<Vec<CodeChange>>,
}

/// The stateful orchestrator over the walker, the two stores and the diff
/// engine. All checkpoint operations go through here.
#[derive(Debug, Clone)]
pub struct SnapshotService {
    project_root: PathBuf,
    walker: ProjectWalker,
    content: ContentStore,
    checkpoints: CheckpointStore,
}

impl SnapshotService {
    /// Open (creating if needed) the store at `<project_root>/.codesnap`.
    pub fn open(project_root: &Path, config: &Config) -> Result<Self, CodeSnapError> {
        let base_path = project_root.join(".codesnap");
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            project_root: project_root.to_path_buf(),
            walker: ProjectWalker::new(project_root, config),
            content: ContentStore::open(&base_path)?,
            checkpoints: CheckpointStore::open(&base_path)?,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn content_store(&self) -> &ContentStore {
        &self.content
    }

    pub fn checkpoint_store(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Snapshot the current project tree into a new checkpoint.
    ///
    /// Unreadable, oversized and non-UTF-8 files are skipped. A failure
    /// partway through may leave orphan blobs but never a partial manifest.
    pub fn create_checkpoint(
        &self,
        description: &str,
        tags: Vec<String>,
        prompt: Option<Prompt>,
    ) -> Result<Checkpoint, CodeSnapError> {
        self.create_checkpoint_inner(description, tags, prompt)
            .map_err(|e| CodeSnapError::checkpoint("could not snapshot project tree", e))
    }

    /// Create an initial checkpoint without a prompt.
    pub fn create_initial_checkpoint(
        &self,
        description: &str,
    ) -> Result<Checkpoint, CodeSnapError> {
        self.create_checkpoint(description, Vec::new(), None)
    }

    fn create_checkpoint_inner(
        &self,
        description: &str,
        tags: Vec<String>,
        prompt: Option<Prompt>,
    ) -> Result<Checkpoint, CodeSnapError> {
        let id = self.checkpoints.next_id()?;

        let mut file_snapshots = BTreeMap::new();
        for path in self.walker.enumerate(None)? {
            let Some(content) = self.walker.read(&path) else {
                continue;
            };
            let rel = ProjectWalker::relative_path(&self.project_root, &path)?;
            let address = self.content.put(&content)?;
            file_snapshots.insert(rel, address);
        }

        let checkpoint = Checkpoint {
            prompt,
            tags,
            file_snapshots,
            ..Checkpoint::new(id, description)
        };
        self.checkpoints.save(&checkpoint)?;
        Ok(checkpoint)
    }

    // -----------------------------------------------------------------------
    // Compare
    // -----------------------------------------------------------------------

    /// Diff two checkpoints. Paths present in either manifest are compared
    /// by content; unchanged files are omitted. Output is sorted by path.
    pub fn compare_checkpoints(
        &self,
        a_id: u64,
        b_id: u64,
        styled: bool,
    ) -> Result<Vec<CodeChange>, CodeSnapError> {
        let a = self.load_for_compare(a_id)?;
        let b = self.load_for_compare(b_id)?;

        let paths: BTreeSet<&String> = a
            .file_snapshots
            .keys()
            .chain(b.file_snapshots.keys())
            .collect();

        let mut changes = Vec::new();
        for path in paths {
            let old_content = a
                .file_snapshots
                .get(path)
                .and_then(|addr| self.content.get(addr));
            let new_content = b
                .file_snapshots
                .get(path)
                .and_then(|addr| self.content.get(addr));
            if let Some(change) = compare_content(path, old_content, new_content, styled) {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    /// Diff a checkpoint against the live project tree. A live path exists
    /// iff the walker returned it and its content was readable; contents are
    /// compared directly, without hashing the live side.
    pub fn compare_with_current(
        &self,
        id: u64,
        styled: bool,
    ) -> Result<Vec<CodeChange>, CodeSnapError> {
        let checkpoint = self.load_for_compare(id)?;

        let mut live: BTreeMap<String, String> = BTreeMap::new();
        for path in self.walker.enumerate(None)? {
            let Some(content) = self.walker.read(&path) else {
                continue;
            };
            let rel = ProjectWalker::relative_path(&self.project_root, &path)?;
            live.insert(rel, content);
        }

        let paths: BTreeSet<String> = checkpoint
            .file_snapshots
            .keys()
            .chain(live.keys())
            .cloned()
            .collect();

        let mut changes = Vec::new();
        for path in &paths {
            let old_content = checkpoint
                .file_snapshots
                .get(path)
                .and_then(|addr| self.content.get(addr));
            let new_content = live.get(path).cloned();
            if let Some(change) = compare_content(path, old_content, new_content, styled) {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    fn load_for_compare(&self, id: u64) -> Result<Checkpoint, CodeSnapError> {
        self.checkpoints
            .load(id)?
            .ok_or_else(|| CodeSnapError::Comparison(format!("checkpoint not found: {id}")))
    }

    // -----------------------------------------------------------------------
    // Restore
    // -----------------------------------------------------------------------

    /// Restore the project tree to the state of `target_id`.
    ///
    /// Returns `false` if the target does not exist. Otherwise: every
    /// checkpoint strictly later than the target is deleted, surplus live
    /// files are removed, and the target's snapshot is materialized under
    /// `restore_root` (default: the project root). Blobs missing from the
    /// content store are skipped at the file level without aborting.
    ///
    /// Re-running the same restore is idempotent and safe.
    pub fn restore_checkpoint(
        &self,
        target_id: u64,
        restore_root: Option<&Path>,
    ) -> Result<bool, CodeSnapError> {
        let Some(target) = self.checkpoints.load(target_id)? else {
            return Ok(false);
        };
        let root = restore_root.unwrap_or(&self.project_root).to_path_buf();
        self.restore_inner(&target, &root)
            .map_err(|e| CodeSnapError::restore(format!("checkpoint {target_id}"), e))?;
        Ok(true)
    }

    fn restore_inner(&self, target: &Checkpoint, root: &Path) -> Result<(), CodeSnapError> {
        // Manifest paths drive file writes and deletes below; refuse traversal.
        for path in target.file_snapshots.keys() {
            if !is_safe_relative(path) {
                return Err(CodeSnapError::Storage(format!(
                    "manifest contains unsafe path: {path}"
                )));
            }
        }

        // Prune every checkpoint strictly later than the target. Blobs stay.
        for checkpoint in self.checkpoints.list()? {
            if checkpoint.timestamp > target.timestamp {
                self.checkpoints.delete(checkpoint.id)?;
            }
        }

        // Delete live files the target doesn't know about.
        let mut live_paths = BTreeSet::new();
        for path in self.walker.enumerate(Some(root))? {
            live_paths.insert(ProjectWalker::relative_path(root, &path)?);
        }
        for surplus in live_paths
            .iter()
            .filter(|p| !target.file_snapshots.contains_key(*p))
        {
            // Individual delete failures leave the file behind; a rerun of
            // the same restore picks it up again.
            let _ = fs::remove_file(root.join(surplus));
        }

        // Materialize the target snapshot.
        for (path, address) in &target.file_snapshots {
            let dest = root.join(path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            match self.content.get(address) {
                Some(content) => fs::write(&dest, content)?,
                // Corrupt or missing blob: skip this file, keep restoring.
                None => continue,
            }
        }

        Ok(())
    }

    /// Record a completed restore as a new checkpoint: snapshot the restored
    /// tree, then patch `restored_from`/`restore_timestamp` on the manifest.
    /// Restore checkpoints break the timeline chain.
    pub fn record_restore(&self, target_id: u64) -> Result<Checkpoint, CodeSnapError> {
        let mut checkpoint = self.create_checkpoint(
            &format!("Restored from checkpoint {target_id}"),
            Vec::new(),
            None,
        )?;
        checkpoint.restored_from = Some(target_id);
        checkpoint.restore_timestamp = Some(Utc::now());
        self.checkpoints.save(&checkpoint)?;
        Ok(checkpoint)
    }

    // -----------------------------------------------------------------------
    // Timeline
    // -----------------------------------------------------------------------

    /// Read-only iteration over all checkpoints in ascending timestamp
    /// order, with per-pair diffs for the export renderers. Each prompted,
    /// non-restore checkpoint carries its changes against the immediately
    /// preceding non-restore checkpoint; restore checkpoints never become
    /// the "previous" reference.
    pub fn timeline(&self) -> Result<Vec<TimelineEntry>, CodeSnapError> {
        let mut entries = Vec::new();
        let mut prev: Option<u64> = None;

        for checkpoint in self.checkpoints.list()? {
            let changes = match prev {
                Some(prev_id) if checkpoint.prompt.is_some() && !checkpoint.is_restore() => {
                    Some(self.compare_checkpoints(prev_id, checkpoint.id, false)?)
                }
                _ => None,
            };
            if !checkpoint.is_restore() {
                prev = Some(checkpoint.id);
            }
            entries.push(TimelineEntry { checkpoint, changes });
        }

        Ok(entries)
    }
}

/// Compare two optional contents for one path and classify the result.
/// Equal or doubly-absent contents produce no change.
fn compare_content(
    file_path: &str,
    old_content: Option<String>,
    new_content: Option<String>,
    styled: bool,
) -> Option<CodeChange> {
    let (change_type, old_text, new_text) = match (&old_content, &new_content) {
        (Some(old), Some(new)) if old == new => return None,
        (Some(old), Some(new)) => (ChangeType::Modified, old.as_str(), new.as_str()),
        (Some(old), None) => (ChangeType::Deleted, old.as_str(), ""),
        (None, Some(new)) => (ChangeType::Added, "", new.as_str()),
        (None, None) => return None,
    };

    let diff = generate_diff(old_text, new_text);
    let styled = styled.then(|| generate_diff_styled(old_text, new_text));

    Some(CodeChange {
        file_path: file_path.to_string(),
        change_type,
        old_content,
        new_content,
        diff,
        styled,
    })
}

/// True for relative paths with no `..` or root components.
fn is_safe_relative(path: &str) -> bool {
    let path = Path::new(path);
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
