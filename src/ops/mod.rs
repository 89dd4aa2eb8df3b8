//! High-level operations.
//!
//! This module contains the implementation of microbench commands.

pub mod clean;
pub mod edges;
pub mod generate;
pub mod launcher;
pub mod package;
pub mod provision;

pub use clean::clean;
pub use edges::{describe, UnitReport};
pub use generate::{effective_settings, generate, GenerateOptions, GenerateResult};
pub use launcher::{assemble, write_script, ClasspathEntry, GenerateError, LauncherInputs};
pub use package::{package_unit, PackageError};
pub use provision::{provision, ProvisionError};
