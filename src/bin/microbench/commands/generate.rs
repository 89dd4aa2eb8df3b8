//! `microbench generate` command

use std::path::Path;

use anyhow::Result;

use crate::cli::GenerateArgs;
use microbench::ops::generate::{effective_settings, generate, GenerateOptions};

pub fn execute(args: GenerateArgs, manifest_path: Option<&Path>) -> Result<()> {
    let ws = super::load_workspace(manifest_path)?;

    // CLI overrides the manifest's [microbench] block
    let settings = effective_settings(&ws.manifest().microbench, args.jmh_version, args.jvm_options);

    let opts = GenerateOptions {
        settings,
        java_version: args.java_version,
        package: !args.no_package,
        dry_run: args.dry_run,
    };

    let result = generate(&ws, &opts)?;

    if args.dry_run {
        print!("{}", result.script);
        return Ok(());
    }

    if result.packaged {
        eprintln!("    Packaged {}", result.archive.display());
    }
    tracing::debug!("launcher targets Java {}", result.java_version);

    Ok(())
}
