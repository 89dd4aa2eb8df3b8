//! Packaging of a unit's compiled output into a single archive.
//!
//! The archive is written by the JDK `jar` tool into a temp file beside the
//! destination and renamed into place, so a failed run never leaves a
//! truncated archive behind.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::host::ProjectHost;
use crate::core::unit::UnitName;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::process::ProcessBuilder;

/// Error while packaging a unit.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("unit `{0}` is not registered")]
    UnknownUnit(UnitName),

    #[error("compiled output of `{unit}` not found at `{}`", .path.display())]
    MissingOutput { unit: UnitName, path: PathBuf },

    #[error("`jar` failed while packaging `{unit}`: {message}")]
    ToolFailed { unit: UnitName, message: String },

    #[error("failed to write archive `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PackageError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            PackageError::MissingOutput { path, .. } => diag
                .with_location(path)
                .with_suggestion(suggestions::NOT_COMPILED),
            PackageError::ToolFailed { .. } => diag.with_suggestion(suggestions::NO_JDK),
            PackageError::Io { .. } => diag.with_suggestion(suggestions::WRITE_FAILED),
            PackageError::UnknownUnit(_) => diag,
        }
    }
}

/// The `jar` invocation that archives `output` and the existing `resources`
/// into `archive`.
pub fn jar_command(jar_tool: &Path, archive: &Path, output: &Path, resources: &[PathBuf]) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(jar_tool)
        .arg("cf")
        .arg(archive)
        .arg("-C")
        .arg(output)
        .arg(".");
    for dir in resources.iter().filter(|d| d.is_dir()) {
        cmd = cmd.arg("-C").arg(dir).arg(".");
    }
    cmd
}

/// Package `unit`'s compiled output into `dest` and return `dest`.
pub fn package_unit<H: ProjectHost + ?Sized>(
    host: &H,
    unit: &UnitName,
    dest: &Path,
    jar_tool: &Path,
) -> Result<PathBuf, PackageError> {
    let compiled = host
        .unit(unit)
        .ok_or_else(|| PackageError::UnknownUnit(unit.clone()))?;

    let output = compiled.output_dir();
    if !output.is_dir() {
        return Err(PackageError::MissingOutput {
            unit: unit.clone(),
            path: output.to_path_buf(),
        });
    }

    let classes = WalkDir::new(output)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "class"))
        .count();
    if classes == 0 {
        tracing::warn!("no compiled classes in {}", output.display());
    }

    let io_err = |source| PackageError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let parent = dest.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let staging = tempfile::Builder::new()
        .prefix(".microbench")
        .suffix(".jar")
        .tempfile_in(parent)
        .map_err(io_err)?;

    jar_command(jar_tool, staging.path(), output, compiled.resource_dirs())
        .exec_and_check()
        .map_err(|e| PackageError::ToolFailed {
            unit: unit.clone(),
            message: format!("{:#}", e),
        })?;

    staging.persist(dest).map_err(|e| io_err(e.error))?;

    tracing::debug!("packaged {} classes into {}", classes, dest.display());
    Ok(dest.to_path_buf())
}
