//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// microbench - provision a JMH benchmark unit and generate its launcher
#[derive(Parser)]
#[command(name = "microbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Microbench.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true, env = "MICROBENCH_MANIFEST")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package the benchmark classes and write the launcher script
    Generate(GenerateArgs),

    /// Show the benchmark unit's dependency edges and runtime files
    Edges(EdgesArgs),

    /// Remove the packaged archive and the launcher script
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// JMH version (overrides [microbench] jmh-version)
    #[arg(long)]
    pub jmh_version: Option<String>,

    /// JVM option for the launcher; repeat for several (replaces [microbench] jvm-options)
    #[arg(long = "jvm-option", allow_hyphen_values = true)]
    pub jvm_options: Vec<String>,

    /// Java major version to generate for (skips detecting the JDK version)
    #[arg(long)]
    pub java_version: Option<u32>,

    /// Do not run `jar`; assume the archive is already in place
    #[arg(long)]
    pub no_package: bool,

    /// Print the script to stdout instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct EdgesArgs {
    /// JMH version (overrides [microbench] jmh-version)
    #[arg(long)]
    pub jmh_version: Option<String>,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Only remove the launcher script
    #[arg(long)]
    pub script_only: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
