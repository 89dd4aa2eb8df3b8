//! Core data structures for microbench.
//!
//! This module contains the foundational types used throughout the crate:
//! - Compilation units and dependency edges
//! - The `ProjectHost` seam onto the build platform, and its in-memory implementation
//! - Manifests and workspace layout

pub mod dependency;
pub mod host;
pub mod manifest;
pub mod project;
pub mod unit;
pub mod workspace;

pub use dependency::{Coordinate, DependencyEdge, DependencyScope, DependencyTarget};
pub use host::{HostError, ProjectHost, ResolveError};
pub use manifest::{Manifest, MicrobenchSettings};
pub use project::Project;
pub use unit::{CompilationUnit, UnitName, UnitSpec};
pub use workspace::{find_manifest, Workspace};
