//! `microbench clean` command

use std::path::Path;

use anyhow::Result;

use crate::cli::CleanArgs;
use microbench::ops::clean::clean;

pub fn execute(args: CleanArgs, manifest_path: Option<&Path>) -> Result<()> {
    let ws = super::load_workspace(manifest_path)?;

    for path in clean(&ws, args.script_only)? {
        eprintln!("     Removed {}", path.display());
    }

    Ok(())
}
