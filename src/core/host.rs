//! The project host - the build platform this crate plugs into.
//!
//! The host owns the unit registry and the dependency graph. Everything in
//! `ops` talks to it through [`ProjectHost`] and never keeps its own copy
//! of the graph.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::dependency::DependencyEdge;
use crate::core::unit::{CompilationUnit, UnitName, UnitSpec};
use crate::util::diagnostic::Diagnostic;

/// Error while registering a unit with the host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("unit `{0}` is already registered")]
    UnitExists(UnitName),

    #[error("unit `{0}` is not registered")]
    UnknownUnit(UnitName),
}

/// Error while resolving a unit's runtime file set.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unit `{0}` is not registered")]
    UnknownUnit(UnitName),

    #[error("could not resolve runtime files of `{unit}`: {}", .missing.join(", "))]
    UnresolvedRuntimeFiles { unit: UnitName, missing: Vec<String> },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnknownUnit(unit) => {
                Diagnostic::error(format!("unit `{}` is not registered", unit))
                    .with_suggestion(format!("Declare it under [units.{}] in Microbench.toml", unit))
            }
            ResolveError::UnresolvedRuntimeFiles { unit, missing } => {
                let mut diag = Diagnostic::error(format!(
                    "could not resolve the runtime files of `{}`",
                    unit
                ));
                for m in missing {
                    diag = diag.with_context(format!("not found: {}", m));
                }
                diag.with_suggestion("Fetch the missing artifacts into the local repository")
                    .with_suggestion("Point [repository] local in .microbench/config.toml at the right directory")
            }
        }
    }
}

/// Narrow interface onto the host build platform.
pub trait ProjectHost {
    /// Absolute project root.
    fn root(&self) -> &Path;

    /// Absolute build output root.
    fn build_dir(&self) -> PathBuf;

    /// Look up a registered unit.
    fn unit(&self, name: &UnitName) -> Option<&CompilationUnit>;

    /// Check if a unit is registered.
    fn has_unit(&self, name: &UnitName) -> bool {
        self.unit(name).is_some()
    }

    /// Register a new unit.
    fn create_unit(&mut self, spec: UnitSpec) -> Result<&CompilationUnit, HostError>;

    /// Declare a dependency edge. Edges are additive; declaring an identical
    /// edge twice has no further effect.
    fn declare_edge(&mut self, edge: DependencyEdge) -> Result<(), HostError>;

    /// All edges declared from `unit`, in declaration order.
    fn edges_of(&self, unit: &UnitName) -> Vec<&DependencyEdge>;

    /// The flat, ordered runtime file set of a unit.
    fn resolve_runtime_files(&self, unit: &UnitName) -> Result<Vec<PathBuf>, ResolveError>;
}
