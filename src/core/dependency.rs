//! Dependency edges between compilation units.
//!
//! An edge says that a unit needs something at a given scope: another
//! unit's output, everything another unit's scope already carries, an
//! external library coordinate, or a plain file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::unit::UnitName;

/// Visibility scope of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyScope {
    /// Needed to compile, absent at runtime
    CompileOnly,
    /// Annotation processors run by the compiler
    AnnotationProcessor,
    /// Needed to compile and at runtime
    Implementation,
}

impl DependencyScope {
    /// The Gradle configuration suffix for this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyScope::CompileOnly => "compileOnly",
            DependencyScope::AnnotationProcessor => "annotationProcessor",
            DependencyScope::Implementation => "implementation",
        }
    }

    /// Whether artifacts on this scope end up on the runtime class-path.
    pub fn is_runtime(&self) -> bool {
        matches!(self, DependencyScope::Implementation)
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external library coordinate: `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Coordinate {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Location of the jar inside a Maven-layout repository, relative to its root.
    pub fn repository_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for part in self.group.split('.') {
            path.push(part);
        }
        path.push(&self.artifact);
        path.push(&self.version);
        path.push(format!("{}-{}.jar", self.artifact, self.version));
        path
    }

    /// Check if a string looks like a coordinate rather than a file path.
    pub fn looks_like(s: &str) -> bool {
        !s.contains('/') && !s.contains('\\') && s.parse::<Coordinate>().is_ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Coordinate::new(*group, *artifact, *version))
            }
            _ => Err(format!(
                "invalid coordinate `{}`; expected `group:artifact:version`",
                s
            )),
        }
    }
}

/// What an edge points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DependencyTarget {
    /// Compiled output of another unit
    UnitOutput { unit: UnitName },
    /// Everything declared on another unit's scope
    Inherited { unit: UnitName, scope: DependencyScope },
    /// External library
    Library { coordinate: Coordinate },
    /// A file on disk (absolute once registered)
    File { path: PathBuf },
}

impl fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyTarget::UnitOutput { unit } => write!(f, "output of `{}`", unit),
            DependencyTarget::Inherited { unit, scope } => write!(f, "{}.{}", unit, scope),
            DependencyTarget::Library { coordinate } => write!(f, "{}", coordinate),
            DependencyTarget::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// A `(unit, scope, target)` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    pub unit: UnitName,
    pub scope: DependencyScope,
    pub target: DependencyTarget,
}

impl DependencyEdge {
    pub fn new(unit: UnitName, scope: DependencyScope, target: DependencyTarget) -> Self {
        DependencyEdge {
            unit,
            scope,
            target,
        }
    }

    /// Edge onto another unit's compiled output.
    pub fn output(unit: UnitName, scope: DependencyScope, of: UnitName) -> Self {
        Self::new(unit, scope, DependencyTarget::UnitOutput { unit: of })
    }

    /// Edge inheriting another unit's scope.
    pub fn inherits(unit: UnitName, scope: DependencyScope, from: UnitName) -> Self {
        Self::new(unit, scope, DependencyTarget::Inherited { unit: from, scope })
    }

    /// Edge onto an external library.
    pub fn library(unit: UnitName, scope: DependencyScope, coordinate: Coordinate) -> Self {
        Self::new(unit, scope, DependencyTarget::Library { coordinate })
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} -> {}", self.unit, self.scope, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let c: Coordinate = "org.openjdk.jmh:jmh-core:1.21".parse().unwrap();
        assert_eq!(c.group, "org.openjdk.jmh");
        assert_eq!(c.artifact, "jmh-core");
        assert_eq!(c.version, "1.21");
        assert_eq!(c.to_string(), "org.openjdk.jmh:jmh-core:1.21");
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!("jmh-core".parse::<Coordinate>().is_err());
        assert!("a:b".parse::<Coordinate>().is_err());
        assert!("a::1.0".parse::<Coordinate>().is_err());
        assert!("a:b:c:d".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_looks_like_coordinate() {
        assert!(Coordinate::looks_like("junit:junit:4.13.2"));
        assert!(!Coordinate::looks_like("libs/local.jar"));
        assert!(!Coordinate::looks_like("C:\\libs\\a:b:c"));
    }

    #[test]
    fn test_repository_path() {
        let c = Coordinate::new("org.openjdk.jmh", "jmh-core", "1.21");
        assert_eq!(
            c.repository_path(),
            PathBuf::from("org/openjdk/jmh/jmh-core/1.21/jmh-core-1.21.jar")
        );
    }

    #[test]
    fn test_scope_names_match_serde() {
        for scope in [
            DependencyScope::CompileOnly,
            DependencyScope::AnnotationProcessor,
            DependencyScope::Implementation,
        ] {
            assert_eq!(
                serde_json::to_string(&scope).unwrap(),
                format!("\"{}\"", scope.as_str())
            );
        }
        assert!(!DependencyScope::CompileOnly.is_runtime());
        assert!(DependencyScope::Implementation.is_runtime());
    }

    #[test]
    fn test_edge_display() {
        let edge = DependencyEdge::inherits(
            UnitName::microbench(),
            DependencyScope::Implementation,
            UnitName::test(),
        );
        assert_eq!(edge.to_string(), "microbench.implementation -> test.implementation");
    }
}
