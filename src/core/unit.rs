//! Compilation units - named groups of sources with their own output.
//!
//! A unit is the analogue of a Gradle source set: source roots, resource
//! roots, a compiled output directory and a set of dependency scopes that
//! live in the project host.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the primary (production code) unit.
pub const MAIN_UNIT: &str = "main";

/// Name of the test unit.
pub const TEST_UNIT: &str = "test";

/// Name of the auxiliary micro-benchmark unit created by the provisioner.
pub const MICROBENCH_UNIT: &str = "microbench";

/// The name of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitName(String);

impl UnitName {
    /// Create a unit name.
    pub fn new(name: impl Into<String>) -> Self {
        UnitName(name.into())
    }

    /// The primary unit.
    pub fn main() -> Self {
        UnitName::new(MAIN_UNIT)
    }

    /// The test unit.
    pub fn test() -> Self {
        UnitName::new(TEST_UNIT)
    }

    /// The micro-benchmark unit.
    pub fn microbench() -> Self {
        UnitName::new(MICROBENCH_UNIT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitName {
    fn from(s: &str) -> Self {
        UnitName::new(s)
    }
}

impl From<String> for UnitName {
    fn from(s: String) -> Self {
        UnitName(s)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What a caller asks the host to register.
///
/// Directories are relative to the project root unless already absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpec {
    pub name: UnitName,
    pub source_dirs: Vec<PathBuf>,
    pub resource_dirs: Vec<PathBuf>,
    /// Output directory; the host picks its convention when `None`.
    pub output_dir: Option<PathBuf>,
}

impl UnitSpec {
    /// A spec with no directories.
    pub fn new(name: impl Into<UnitName>) -> Self {
        UnitSpec {
            name: name.into(),
            source_dirs: Vec::new(),
            resource_dirs: Vec::new(),
            output_dir: None,
        }
    }

    /// Add a source root.
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dirs.push(dir.into());
        self
    }

    /// Add a resource root.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dirs.push(dir.into());
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// The Gradle-style default layout: `src/<name>/java`, `src/<name>/resources`.
    pub fn conventional(name: impl Into<UnitName>) -> Self {
        let name = name.into();
        let base = Path::new("src").join(name.as_str());
        UnitSpec::new(name)
            .with_source_dir(base.join("java"))
            .with_resource_dir(base.join("resources"))
    }
}

/// A registered compilation unit.
///
/// All directories are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
    name: UnitName,
    source_dirs: Vec<PathBuf>,
    resource_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl CompilationUnit {
    /// Create a unit with absolute directories.
    pub fn new(
        name: UnitName,
        source_dirs: Vec<PathBuf>,
        resource_dirs: Vec<PathBuf>,
        output_dir: PathBuf,
    ) -> Self {
        CompilationUnit {
            name,
            source_dirs,
            resource_dirs,
            output_dir,
        }
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    pub fn source_dirs(&self) -> &[PathBuf] {
        &self.source_dirs
    }

    pub fn resource_dirs(&self) -> &[PathBuf] {
        &self.resource_dirs
    }

    /// Directory holding the compiled classes.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_layout() {
        let spec = UnitSpec::conventional("main");
        assert_eq!(spec.name.as_str(), "main");
        assert_eq!(spec.source_dirs, vec![PathBuf::from("src/main/java")]);
        assert_eq!(spec.resource_dirs, vec![PathBuf::from("src/main/resources")]);
        assert!(spec.output_dir.is_none());
    }

    #[test]
    fn test_unit_name_display() {
        assert_eq!(UnitName::microbench().to_string(), "microbench");
        assert_eq!(UnitName::from("test"), UnitName::test());
    }
}
