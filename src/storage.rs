use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::CodeSnapError;
use crate::models::Checkpoint;

/// Compute the SHA-256 hex digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Write `data` to `dest` atomically: write a sibling temp file, then rename.
fn write_atomic(dest: &Path, data: &[u8]) -> Result<(), CodeSnapError> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| CodeSnapError::Storage(format!("invalid path: {}", dest.display())))?
        .to_string_lossy();
    let tmp = dest.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp, data)?;
    fs::rename(&tmp, dest)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Content store
// ---------------------------------------------------------------------------

/// Content-addressed blob store under `<base_path>/files/`. Each blob is the
/// raw UTF-8 bytes of a file snapshot, named by its lowercase hex SHA-256.
/// Blobs are immutable and stored once however many checkpoints reference
/// them.
#[derive(Debug, Clone)]
pub struct ContentStore {
    files_dir: PathBuf,
}

impl ContentStore {
    pub fn open(base_path: &Path) -> Result<Self, CodeSnapError> {
        let files_dir = base_path.join("files");
        fs::create_dir_all(&files_dir)?;
        Ok(Self { files_dir })
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    /// Store `content` and return its address. Idempotent: an existing blob
    /// with the same address short-circuits the write.
    pub fn put(&self, content: &str) -> Result<String, CodeSnapError> {
        let address = sha256_hex(content.as_bytes());
        let dest = self.files_dir.join(&address);
        if !dest.exists() {
            write_atomic(&dest, content.as_bytes()).map_err(|e| {
                CodeSnapError::Storage(format!("failed to write blob {address}: {e}"))
            })?;
        }
        Ok(address)
    }

    /// Load a blob by address, or `None` if it is absent or unreadable.
    pub fn get(&self, address: &str) -> Option<String> {
        fs::read_to_string(self.files_dir.join(address)).ok()
    }
}

// ---------------------------------------------------------------------------
// Checkpoint store
// ---------------------------------------------------------------------------

/// Manifest store under `<base_path>/checkpoints/`, one self-describing JSON
/// file per checkpoint, named `<id>.json`.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    checkpoints_dir: PathBuf,
}

impl CheckpointStore {
    pub fn open(base_path: &Path) -> Result<Self, CodeSnapError> {
        let checkpoints_dir = base_path.join("checkpoints");
        fs::create_dir_all(&checkpoints_dir)?;
        Ok(Self { checkpoints_dir })
    }

    pub fn checkpoints_dir(&self) -> &Path {
        &self.checkpoints_dir
    }

    fn manifest_path(&self, id: u64) -> PathBuf {
        self.checkpoints_dir.join(format!("{id}.json"))
    }

    /// Persist a manifest. Overwriting an existing manifest is permitted;
    /// the snapshot service uses this to patch `restored_from` fields.
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), CodeSnapError> {
        let json = serde_json::to_string_pretty(checkpoint)
            .map_err(|e| CodeSnapError::Storage(format!("failed to serialize manifest: {e}")))?;
        write_atomic(&self.manifest_path(checkpoint.id), json.as_bytes())
    }

    pub fn load(&self, id: u64) -> Result<Option<Checkpoint>, CodeSnapError> {
        let path = self.manifest_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let checkpoint = serde_json::from_str(&data).map_err(|e| {
            CodeSnapError::Storage(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(checkpoint))
    }

    /// Integer ids of all manifest files. Stems that do not parse as a
    /// positive integer are ignored.
    fn manifest_ids(&self) -> Result<Vec<u64>, CodeSnapError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.checkpoints_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.parse::<u64>() {
                Ok(id) if id > 0 => ids.push(id),
                _ => continue,
            }
        }
        Ok(ids)
    }

    /// Load every manifest, sorted ascending by timestamp with id as the
    /// tiebreaker.
    pub fn list(&self) -> Result<Vec<Checkpoint>, CodeSnapError> {
        let mut checkpoints = Vec::new();
        for id in self.manifest_ids()? {
            if let Some(checkpoint) = self.load(id)? {
                checkpoints.push(checkpoint);
            }
        }
        checkpoints.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(checkpoints)
    }

    /// One plus the maximum existing id, or 1 for an empty store.
    pub fn next_id(&self) -> Result<u64, CodeSnapError> {
        Ok(self.manifest_ids()?.into_iter().max().map_or(1, |id| id + 1))
    }

    /// Remove a manifest file. A no-op if absent. Referenced blobs are not
    /// touched.
    pub fn delete(&self, id: u64) -> Result<(), CodeSnapError> {
        match fs::remove_file(self.manifest_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
