//! microbench CLI - JMH launcher generation

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use microbench::core::manifest::ManifestError;
use microbench::core::ResolveError;
use microbench::ops::{GenerateError, PackageError, ProvisionError};
use microbench::util::diagnostic::{emit, Diagnostic};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match diagnostic_for(&e) {
            Some(diag) => emit(&diag, color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("microbench=debug")
    } else {
        EnvFilter::new("microbench=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    let manifest_path = cli.manifest_path.as_deref();
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, manifest_path),
        Commands::Edges(args) => commands::edges::execute(args, manifest_path),
        Commands::Clean(args) => commands::clean::execute(args, manifest_path),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Render known library errors with their suggestions.
fn diagnostic_for(e: &anyhow::Error) -> Option<Diagnostic> {
    e.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<GenerateError>() {
            Some(e.to_diagnostic())
        } else if let Some(e) = cause.downcast_ref::<ProvisionError>() {
            Some(e.to_diagnostic())
        } else if let Some(e) = cause.downcast_ref::<PackageError>() {
            Some(e.to_diagnostic())
        } else if let Some(e) = cause.downcast_ref::<ResolveError>() {
            Some(e.to_diagnostic())
        } else {
            cause.downcast_ref::<ManifestError>().map(|e| e.to_diagnostic())
        }
    })
}
