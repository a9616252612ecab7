//! Retention-based pruning of rotated daily files

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use logward_core::Result;
use tracing::{debug, error};

/// Delete daily files with the given extension beyond the retention count.
///
/// Keeps the `retain` most recently modified files; the just-created current
/// file is always among them. Best-effort: each deletion failure is reported
/// individually and does not abort the pass. Returns the number of files
/// deleted.
pub fn prune_directory(dir: &Path, retain: usize, ext: &str) -> Result<usize> {
    let retain = retain.max(1);
    if !dir.exists() {
        return Ok(0);
    }

    let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => files.push((path, modified)),
            Err(e) => debug!("Skipping unreadable log file {}: {}", path.display(), e),
        }
    }

    if files.len() <= retain {
        return Ok(0);
    }

    // Most recent first
    files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut deleted = 0;
    for (path, _) in files.drain(retain..) {
        match fs::remove_file(&path) {
            Ok(()) => {
                deleted += 1;
                debug!("Pruned old log file: {}", path.display());
            }
            // Another pruning pass or the operator got there first
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!("Failed to delete old log file {}: {}", path.display(), e),
        }
    }

    Ok(deleted)
}
