use crate::commands::resolve_checkpoint_ref;
use crate::config::Config;
use crate::diff::{DiffLine, DiffLineKind};
use crate::error::{find_project_root, CodeSnapError};
use crate::models::CodeChange;
use crate::service::SnapshotService;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

pub fn run(
    checkpoint1: &str,
    checkpoint2: Option<&str>,
    current: bool,
) -> Result<(), CodeSnapError> {
    let root = find_project_root()?;
    let config = Config::load(&root)?;
    let service = SnapshotService::open(&root, &config)?;

    let id1 = resolve_checkpoint_ref(&service, checkpoint1)?;
    let changes = if current {
        println!("Comparing checkpoint {id1} with current state\n");
        service.compare_with_current(id1, true)?
    } else {
        let checkpoint2 = checkpoint2.ok_or_else(|| {
            CodeSnapError::Comparison("two checkpoint ids are required (or use --current)".into())
        })?;
        let id2 = resolve_checkpoint_ref(&service, checkpoint2)?;
        println!("Comparing checkpoints {id1} and {id2}\n");
        service.compare_checkpoints(id1, id2, true)?
    };

    if changes.is_empty() {
        println!("No differences found.");
        return Ok(());
    }

    println!("Found {} changed file(s):\n", changes.len());
    for change in &changes {
        print_change(change);
    }

    Ok(())
}

fn print_change(change: &CodeChange) {
    println!("=== {} ({}) ===", change.file_path, change.change_type);
    if let Some(styled) = &change.styled {
        for line in styled {
            print_line(line);
        }
    } else {
        print!("{}", change.diff);
    }
    println!();
}

fn print_line(line: &DiffLine) {
    match line.kind {
        DiffLineKind::Added => println!("{GREEN}{}{RESET}", line.text),
        DiffLineKind::Removed => println!("{RED}{}{RESET}", line.text),
        DiffLineKind::Header => println!("{CYAN}{}{RESET}", line.text),
        DiffLineKind::Context => println!("{}", line.text),
    }
}
