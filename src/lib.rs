//! microbench - JMH benchmark unit provisioning and launcher generation
//!
//! This crate provides the library behind the `microbench` command: it wires
//! an auxiliary benchmark compilation unit into a project's dependency graph,
//! packages it, and generates the shell script that runs JMH against it.

pub mod core;
pub mod ops;
pub mod util;

pub use core::{
    manifest::Manifest, project::Project, unit::CompilationUnit, workspace::Workspace,
    ProjectHost,
};
