//! Provisioning of the micro-benchmark compilation unit.
//!
//! The new unit sees everything the test unit sees, plus the compiled
//! outputs of the primary and test units, plus JMH. The JMH annotation
//! processor sits on the compile-only and annotation-processing scopes so
//! it never reaches the runtime class-path.

use std::path::Path;

use thiserror::Error;

use crate::core::dependency::{Coordinate, DependencyEdge, DependencyScope};
use crate::core::host::{HostError, ProjectHost};
use crate::core::unit::{CompilationUnit, UnitName, UnitSpec};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Maven group of the harness artifacts.
pub const JMH_GROUP: &str = "org.openjdk.jmh";

/// Harness runtime library.
pub const JMH_CORE: &str = "jmh-core";

/// Harness code generator, run as an annotation processor.
pub const JMH_ANNOTATION_PROCESSOR: &str = "jmh-generator-annprocess";

/// Error while provisioning the benchmark unit.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("a unit named `{0}` already exists")]
    DuplicateUnit(UnitName),

    #[error("unit `{0}` does not exist")]
    MissingUnit(UnitName),

    #[error("unit name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Host(#[from] HostError),
}

impl ProvisionError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ProvisionError::DuplicateUnit(_) => diag.with_suggestion(suggestions::RENAME_UNIT),
            ProvisionError::MissingUnit(unit) => diag
                .with_context("the benchmark unit builds on the primary and test units")
                .with_suggestion(format!("Declare [units.{}] in Microbench.toml", unit)),
            ProvisionError::EmptyName | ProvisionError::Host(_) => diag,
        }
    }
}

/// Harness coordinate for `artifact` at `version`.
pub fn jmh(artifact: &str, version: &str) -> Coordinate {
    Coordinate::new(JMH_GROUP, artifact, version)
}

/// Register the auxiliary unit `aux` and wire its dependencies.
///
/// Sources live in `test/<aux>`, resources in `test/resources`. All checks
/// run before the host is touched, so a failed call leaves the graph as it
/// was.
pub fn provision<H: ProjectHost + ?Sized>(
    host: &mut H,
    aux: &UnitName,
    primary: &UnitName,
    test: &UnitName,
    harness_version: &str,
) -> Result<CompilationUnit, ProvisionError> {
    if aux.as_str().is_empty() {
        return Err(ProvisionError::EmptyName);
    }
    if host.has_unit(aux) {
        return Err(ProvisionError::DuplicateUnit(aux.clone()));
    }
    for required in [primary, test] {
        if !host.has_unit(required) {
            return Err(ProvisionError::MissingUnit(required.clone()));
        }
    }

    let spec = UnitSpec::new(aux.clone())
        .with_source_dir(Path::new("test").join(aux.as_str()))
        .with_resource_dir(Path::new("test").join("resources"));
    let unit = host.create_unit(spec)?.clone();

    use DependencyScope::*;
    let edges = [
        DependencyEdge::inherits(aux.clone(), Implementation, test.clone()),
        DependencyEdge::output(aux.clone(), Implementation, primary.clone()),
        DependencyEdge::output(aux.clone(), Implementation, test.clone()),
        DependencyEdge::library(aux.clone(), Implementation, jmh(JMH_CORE, harness_version)),
        DependencyEdge::library(
            aux.clone(),
            CompileOnly,
            jmh(JMH_ANNOTATION_PROCESSOR, harness_version),
        ),
        DependencyEdge::library(
            aux.clone(),
            AnnotationProcessor,
            jmh(JMH_ANNOTATION_PROCESSOR, harness_version),
        ),
    ];
    for edge in edges {
        host.declare_edge(edge)?;
    }

    tracing::debug!(
        "provisioned `{}` on jmh {} ({} edges)",
        aux,
        harness_version,
        host.edges_of(aux).len()
    );
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::core::dependency::DependencyTarget;
    use crate::core::project::Project;

    fn host() -> Project {
        let mut p = Project::new("demo", "/p", "/repo");
        p.create_unit(UnitSpec::conventional("main")).unwrap();
        p.create_unit(UnitSpec::conventional("test")).unwrap();
        p
    }

    fn provision_default(p: &mut Project) -> Result<CompilationUnit, ProvisionError> {
        provision(
            p,
            &UnitName::microbench(),
            &UnitName::main(),
            &UnitName::test(),
            "1.21",
        )
    }

    #[test]
    fn test_unit_layout() {
        let mut p = host();
        let unit = provision_default(&mut p).unwrap();

        assert_eq!(unit.name(), &UnitName::microbench());
        assert_eq!(unit.source_dirs(), &[PathBuf::from("/p/test/microbench")]);
        assert_eq!(unit.resource_dirs(), &[PathBuf::from("/p/test/resources")]);
        assert_eq!(
            unit.output_dir(),
            Path::new("/p/build/classes/java/microbench")
        );
    }

    #[test]
    fn test_edges_in_order() {
        let mut p = host();
        provision_default(&mut p).unwrap();

        let edges: Vec<String> = p
            .edges_of(&UnitName::microbench())
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            edges,
            vec![
                "microbench.implementation -> test.implementation",
                "microbench.implementation -> output of `main`",
                "microbench.implementation -> output of `test`",
                "microbench.implementation -> org.openjdk.jmh:jmh-core:1.21",
                "microbench.compileOnly -> org.openjdk.jmh:jmh-generator-annprocess:1.21",
                "microbench.annotationProcessor -> org.openjdk.jmh:jmh-generator-annprocess:1.21",
            ]
        );
    }

    #[test]
    fn test_harness_version_is_pinned() {
        let mut p = host();
        provision(
            &mut p,
            &UnitName::microbench(),
            &UnitName::main(),
            &UnitName::test(),
            "1.36",
        )
        .unwrap();

        for edge in p.edges_of(&UnitName::microbench()) {
            if let DependencyTarget::Library { coordinate } = &edge.target {
                assert_eq!(coordinate.version, "1.36");
            }
        }
    }

    #[test]
    fn test_second_provision_is_rejected() {
        let mut p = host();
        provision_default(&mut p).unwrap();
        let before = p.edges().to_vec();

        let err = provision_default(&mut p).unwrap_err();
        assert!(matches!(err, ProvisionError::DuplicateUnit(ref n) if n == &UnitName::microbench()));
        assert_eq!(p.edges(), before.as_slice());
    }

    #[test]
    fn test_missing_units() {
        let mut p = Project::new("demo", "/p", "/repo");
        p.create_unit(UnitSpec::conventional("main")).unwrap();

        let err = provision_default(&mut p).unwrap_err();
        assert!(matches!(err, ProvisionError::MissingUnit(ref n) if n == &UnitName::test()));
        assert!(!p.has_unit(&UnitName::microbench()));
        assert!(p.edges().is_empty());
    }

    #[test]
    fn test_empty_name() {
        let mut p = host();
        let err = provision(&mut p, &UnitName::new(""), &UnitName::main(), &UnitName::test(), "1.21")
            .unwrap_err();
        assert!(matches!(err, ProvisionError::EmptyName));
    }
}
