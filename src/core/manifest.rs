//! Microbench.toml manifest parsing and schema.
//!
//! The manifest describes the host project: its name, the compilation units
//! the benchmark unit builds upon, and the `[microbench]` extension block.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::dependency::Coordinate;
use crate::core::unit::{MAIN_UNIT, TEST_UNIT};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Microbench.toml";

/// Harness version used when nothing else is configured.
pub const DEFAULT_JMH_VERSION: &str = "1.21";

/// Errors while locating or reading the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no manifest found in `{}` or any parent directory (looked for Microbench.toml)", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("failed to read manifest `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unit `{unit}` extends unknown unit `{extends}`")]
    UnknownExtends { unit: String, extends: String },
}

impl ManifestError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ManifestError::NotFound { dir } => Diagnostic::error(self.to_string())
                .with_location(dir)
                .with_suggestion(suggestions::NO_MANIFEST),
            ManifestError::Read { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string()),
            ManifestError::Parse { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.message().to_string()),
            ManifestError::UnknownExtends { extends, .. } => Diagnostic::error(self.to_string())
                .with_suggestion(format!("Add a [units.{}] table or fix the name", extends)),
        }
    }
}

/// Harness settings from the `[microbench]` block.
///
/// The order of `jvm_options` is the order they appear on the java command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MicrobenchSettings {
    /// JMH version for `jmh-core` and `jmh-generator-annprocess`
    pub jmh_version: String,

    /// Extra JVM options for the launcher script.
    ///
    /// Each option is passed as one literal argument: options containing
    /// shell metacharacters are single-quoted, so `$VAR` is not expanded.
    /// Use `JVM_ARGS` for values that must come from the environment.
    pub jvm_options: Vec<String>,
}

impl Default for MicrobenchSettings {
    fn default() -> Self {
        MicrobenchSettings {
            jmh_version: DEFAULT_JMH_VERSION.to_string(),
            jvm_options: Vec::new(),
        }
    }
}

/// Project metadata from the `[project]` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name, shown in the script header
    pub name: Option<String>,
}

/// A `[units.<name>]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UnitManifest {
    /// Source roots (defaults to `src/<name>/java`)
    pub sources: Option<Vec<PathBuf>>,

    /// Resource roots (defaults to `src/<name>/resources`)
    pub resources: Option<Vec<PathBuf>>,

    /// Output directory (defaults to `build/classes/java/<name>`)
    pub output: Option<PathBuf>,

    /// Units whose output and implementation scope this unit builds upon
    pub extends: Option<Vec<String>>,

    /// `group:artifact:version` coordinates or file paths
    pub dependencies: Vec<String>,
}

/// A dependency entry as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyEntry {
    Library(Coordinate),
    File(PathBuf),
}

impl UnitManifest {
    /// Classify the `dependencies` entries.
    pub fn dependency_entries(&self) -> Vec<DependencyEntry> {
        self.dependencies
            .iter()
            .map(|raw| match raw.parse::<Coordinate>() {
                Ok(coordinate) if Coordinate::looks_like(raw) => DependencyEntry::Library(coordinate),
                _ => DependencyEntry::File(PathBuf::from(raw)),
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    project: ProjectMetadata,

    #[serde(default)]
    microbench: MicrobenchSettings,

    #[serde(default)]
    units: BTreeMap<String, UnitManifest>,
}

/// The parsed manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project name
    pub name: String,

    /// Harness settings
    pub microbench: MicrobenchSettings,

    /// Units in registration order: `main`, `test`, then the rest by name
    pub units: Vec<(String, UnitManifest)>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::parse(&contents, manifest_dir).map_err(|e| match e {
            ManifestError::Parse { source, .. } => ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse manifest text belonging to `manifest_dir`.
    pub fn parse(contents: &str, manifest_dir: PathBuf) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(contents).map_err(|source| ManifestError::Parse {
            path: manifest_dir.join(MANIFEST_NAME),
            source,
        })?;

        let name = raw
            .project
            .name
            .or_else(|| {
                manifest_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "project".to_string());

        let mut units = raw.units;
        let main = units.remove(MAIN_UNIT).unwrap_or_default();
        let mut test = units.remove(TEST_UNIT).unwrap_or_default();
        if test.extends.is_none() {
            test.extends = Some(vec![MAIN_UNIT.to_string()]);
        }

        let mut ordered = vec![(MAIN_UNIT.to_string(), main), (TEST_UNIT.to_string(), test)];
        ordered.extend(units);

        for (unit, table) in &ordered {
            for extends in table.extends.iter().flatten() {
                if !ordered.iter().any(|(n, _)| n == extends) {
                    return Err(ManifestError::UnknownExtends {
                        unit: unit.clone(),
                        extends: extends.clone(),
                    });
                }
            }
        }

        Ok(Manifest {
            name,
            microbench: raw.microbench,
            units: ordered,
            manifest_dir,
        })
    }
}
