//! Removal of generated artifacts.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::unit::UnitName;
use crate::core::workspace::Workspace;
use crate::util::fs::remove_file_if_exists;

/// Remove the launcher script and, unless `script_only`, the packaged archive.
/// Returns what was removed.
pub fn clean(ws: &Workspace, script_only: bool) -> Result<Vec<PathBuf>> {
    let mut targets = vec![ws.script_path()];
    if !script_only {
        targets.push(ws.archive_path(&UnitName::microbench()));
    }

    let mut removed = Vec::new();
    for path in targets {
        if remove_file_if_exists(&path)? {
            tracing::debug!("removed {}", path.display());
            removed.push(path);
        }
    }
    Ok(removed)
}
