use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::CodeSnapError;

/// Write a file only if it doesn't already exist. Returns true if written.
fn write_if_absent(path: &Path, content: &str) -> Result<bool, CodeSnapError> {
    if path.exists() {
        eprintln!("  exists: {}", path.display());
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

pub fn run() -> Result<(), CodeSnapError> {
    let project_root = std::env::current_dir()?;
    let base_dir = project_root.join(".codesnap");

    println!("Initializing codesnap store...");

    for dir in [
        base_dir.clone(),
        base_dir.join("checkpoints"),
        base_dir.join("files"),
    ] {
        fs::create_dir_all(&dir)?;
    }

    let config_yaml = serde_yaml::to_string(&Config::default())?;
    if write_if_absent(&base_dir.join("config.yml"), &config_yaml)? {
        println!("  wrote: {}", base_dir.join("config.yml").display());
    }

    println!("Done. Run `codesnap start` to begin a session.");
    Ok(())
}
