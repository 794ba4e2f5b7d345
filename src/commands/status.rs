use std::fs;

use crate::config::Config;
use crate::error::{find_project_root, CodeSnapError};
use crate::service::SnapshotService;

pub fn run() -> Result<(), CodeSnapError> {
    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    println!("Store: {}", root.join(".codesnap").display());

    let checkpoints = service.checkpoint_store().list()?;
    println!("\n=== Checkpoints ===");
    if checkpoints.is_empty() {
        println!("  (none)");
    } else {
        println!("  {} total", checkpoints.len());
        if let Some(latest) = checkpoints.last() {
            println!(
                "  latest: {} ({}, {} files)",
                latest.name(),
                latest.timestamp.format("%Y-%m-%d %H:%M:%S"),
                latest.file_snapshots.len()
            );
        }
    }

    let mut blob_count: u64 = 0;
    let mut blob_bytes: u64 = 0;
    for entry in fs::read_dir(service.content_store().files_dir())? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            blob_count += 1;
            blob_bytes += entry.metadata()?.len();
        }
    }

    println!("\n=== Blobs ===");
    println!("  {blob_count} stored ({blob_bytes} bytes)");

    Ok(())
}
