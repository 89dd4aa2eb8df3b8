//! `microbench edges` command

use std::path::Path;

use anyhow::Result;

use crate::cli::EdgesArgs;
use microbench::ops::edges::describe;

pub fn execute(args: EdgesArgs, manifest_path: Option<&Path>) -> Result<()> {
    let ws = super::load_workspace(manifest_path)?;

    let jmh_version = args
        .jmh_version
        .unwrap_or_else(|| ws.manifest().microbench.jmh_version.clone());
    let report = describe(&ws, &jmh_version)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.unit.name());
    for edge in &report.edges {
        println!("  {} -> {}", edge.scope, edge.target);
    }

    if report.unresolved.is_empty() {
        println!("runtime files:");
        for file in &report.runtime_files {
            println!("  {}", file.display());
        }
    } else {
        println!("unresolved:");
        for coordinate in &report.unresolved {
            println!("  {}", coordinate);
        }
    }

    Ok(())
}
