//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use microbench::core::Workspace;

pub mod clean;
pub mod completions;
pub mod edges;
pub mod generate;

/// Load the workspace from `--manifest-path`, or search upward from the cwd.
fn load_workspace(manifest_path: Option<&Path>) -> Result<Workspace> {
    match manifest_path {
        Some(path) => Workspace::new(path),
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            Workspace::discover(&cwd)
        }
    }
}
