//! Report on the benchmark unit's wiring, for `microbench edges`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::dependency::DependencyEdge;
use crate::core::host::{ProjectHost, ResolveError};
use crate::core::unit::{CompilationUnit, UnitName};
use crate::core::workspace::Workspace;
use crate::ops::provision::provision;

/// The provisioned unit, its edges and its resolved runtime files.
#[derive(Debug, Serialize)]
pub struct UnitReport {
    pub unit: CompilationUnit,
    pub edges: Vec<DependencyEdge>,
    pub runtime_files: Vec<PathBuf>,
    /// Coordinates missing from the local repository
    pub unresolved: Vec<String>,
}

/// Provision the benchmark unit in memory and describe it.
///
/// Unresolvable libraries are reported, not raised.
pub fn describe(ws: &Workspace, jmh_version: &str) -> Result<UnitReport> {
    let mut project = ws.project()?;
    let aux = UnitName::microbench();
    let unit = provision(&mut project, &aux, &UnitName::main(), &UnitName::test(), jmh_version)?;

    let edges = project.edges_of(&aux).into_iter().cloned().collect();
    let (runtime_files, unresolved) = match project.resolve_runtime_files(&aux) {
        Ok(files) => (files, Vec::new()),
        Err(ResolveError::UnresolvedRuntimeFiles { missing, .. }) => (Vec::new(), missing),
        Err(e) => return Err(e.into()),
    };

    Ok(UnitReport {
        unit,
        edges,
        runtime_files,
        unresolved,
    })
}
