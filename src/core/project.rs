//! In-memory project model.
//!
//! `Project` is the host this crate ships with: a unit registry and an
//! ordered edge list loaded from the manifest, plus runtime resolution
//! against a Maven-layout local repository.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::dependency::{DependencyEdge, DependencyScope, DependencyTarget};
use crate::core::host::{HostError, ProjectHost, ResolveError};
use crate::core::manifest::{DependencyEntry, Manifest};
use crate::core::unit::{CompilationUnit, UnitName, UnitSpec};
use crate::util::fs::absolutize;

/// Name of the build output directory under the project root.
pub const BUILD_DIR: &str = "build";

/// A project and its dependency graph.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    root: PathBuf,
    repository: PathBuf,
    units: Vec<CompilationUnit>,
    edges: Vec<DependencyEdge>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, repository: impl Into<PathBuf>) -> Self {
        Project {
            name: name.into(),
            root: root.into(),
            repository: repository.into(),
            units: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Build the project from a parsed manifest.
    ///
    /// All units are registered before any edge so `extends` may point at
    /// units declared later in the file.
    pub fn from_manifest(manifest: &Manifest, repository: impl Into<PathBuf>) -> Result<Self, HostError> {
        let mut project = Project::new(&manifest.name, &manifest.manifest_dir, repository);

        for (name, table) in &manifest.units {
            let conventional = UnitSpec::conventional(name.as_str());
            let spec = UnitSpec {
                name: conventional.name,
                source_dirs: table.sources.clone().unwrap_or(conventional.source_dirs),
                resource_dirs: table.resources.clone().unwrap_or(conventional.resource_dirs),
                output_dir: table.output.clone(),
            };
            project.create_unit(spec)?;
        }

        for (name, table) in &manifest.units {
            let unit = UnitName::new(name.as_str());
            for parent in table.extends.iter().flatten() {
                let parent = UnitName::new(parent.as_str());
                project.declare_edge(DependencyEdge::output(
                    unit.clone(),
                    DependencyScope::Implementation,
                    parent.clone(),
                ))?;
                project.declare_edge(DependencyEdge::inherits(
                    unit.clone(),
                    DependencyScope::Implementation,
                    parent,
                ))?;
            }
            for entry in table.dependency_entries() {
                let target = match entry {
                    DependencyEntry::Library(coordinate) => DependencyTarget::Library { coordinate },
                    DependencyEntry::File(path) => DependencyTarget::File {
                        path: absolutize(&project.root, &path),
                    },
                };
                project.declare_edge(DependencyEdge::new(
                    unit.clone(),
                    DependencyScope::Implementation,
                    target,
                ))?;
            }
        }

        Ok(project)
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared edges, in declaration order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Append the runtime files contributed by `unit`'s implementation scope.
    fn collect_scope(
        &self,
        unit: &UnitName,
        visited: &mut HashSet<UnitName>,
        files: &mut Vec<PathBuf>,
        missing: &mut Vec<String>,
    ) {
        if !visited.insert(unit.clone()) {
            return;
        }

        for edge in self.edges_of(unit) {
            if !edge.scope.is_runtime() {
                continue;
            }
            match &edge.target {
                DependencyTarget::UnitOutput { unit: of } => {
                    if let Some(u) = self.unit(of) {
                        files.push(u.output_dir().to_path_buf());
                    }
                }
                DependencyTarget::Inherited { unit: from, .. } => {
                    self.collect_scope(from, visited, files, missing);
                }
                DependencyTarget::Library { coordinate } => {
                    let jar = self.repository.join(coordinate.repository_path());
                    if jar.is_file() {
                        files.push(jar);
                    } else {
                        tracing::debug!("{} not found at {}", coordinate, jar.display());
                        missing.push(coordinate.to_string());
                    }
                }
                DependencyTarget::File { path } => files.push(path.clone()),
            }
        }
    }
}

impl ProjectHost for Project {
    fn root(&self) -> &Path {
        &self.root
    }

    fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    fn unit(&self, name: &UnitName) -> Option<&CompilationUnit> {
        self.units.iter().find(|u| u.name() == name)
    }

    fn create_unit(&mut self, spec: UnitSpec) -> Result<&CompilationUnit, HostError> {
        if self.has_unit(&spec.name) {
            return Err(HostError::UnitExists(spec.name));
        }

        let output_dir = spec.output_dir.unwrap_or_else(|| {
            Path::new(BUILD_DIR)
                .join("classes")
                .join("java")
                .join(spec.name.as_str())
        });
        let unit = CompilationUnit::new(
            spec.name,
            spec.source_dirs.iter().map(|d| absolutize(&self.root, d)).collect(),
            spec.resource_dirs.iter().map(|d| absolutize(&self.root, d)).collect(),
            absolutize(&self.root, &output_dir),
        );
        tracing::debug!("registered unit `{}`", unit.name());

        self.units.push(unit);
        Ok(&self.units[self.units.len() - 1])
    }

    fn declare_edge(&mut self, edge: DependencyEdge) -> Result<(), HostError> {
        if !self.has_unit(&edge.unit) {
            return Err(HostError::UnknownUnit(edge.unit));
        }
        if self.edges.contains(&edge) {
            return Ok(());
        }
        tracing::debug!("declared {}", edge);
        self.edges.push(edge);
        Ok(())
    }

    fn edges_of(&self, unit: &UnitName) -> Vec<&DependencyEdge> {
        self.edges.iter().filter(|e| &e.unit == unit).collect()
    }

    /// The unit's own output, then its implementation scope in declaration
    /// order. Later duplicates are dropped.
    fn resolve_runtime_files(&self, unit: &UnitName) -> Result<Vec<PathBuf>, ResolveError> {
        let own = self
            .unit(unit)
            .ok_or_else(|| ResolveError::UnknownUnit(unit.clone()))?;

        let mut files = vec![own.output_dir().to_path_buf()];
        let mut missing = Vec::new();
        self.collect_scope(unit, &mut HashSet::new(), &mut files, &mut missing);

        if !missing.is_empty() {
            return Err(ResolveError::UnresolvedRuntimeFiles {
                unit: unit.clone(),
                missing,
            });
        }

        let mut seen = HashSet::new();
        files.retain(|f| seen.insert(f.clone()));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dependency::Coordinate;
    use tempfile::TempDir;

    fn install(repo: &Path, coordinate: &str) -> PathBuf {
        let c: Coordinate = coordinate.parse().unwrap();
        let jar = repo.join(c.repository_path());
        std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
        std::fs::write(&jar, "").unwrap();
        jar
    }

    fn project(manifest: &str, repo: &Path) -> Project {
        let m = Manifest::parse(manifest, PathBuf::from("/p")).unwrap();
        Project::from_manifest(&m, repo).unwrap()
    }

    #[test]
    fn test_conventional_units() {
        let tmp = TempDir::new().unwrap();
        let p = project("", tmp.path());

        let main = p.unit(&UnitName::main()).unwrap();
        assert_eq!(main.output_dir(), Path::new("/p/build/classes/java/main"));
        assert_eq!(main.source_dirs(), &[PathBuf::from("/p/src/main/java")]);
        assert_eq!(p.build_dir(), PathBuf::from("/p/build"));
    }

    #[test]
    fn test_main_runtime_files() {
        let tmp = TempDir::new().unwrap();
        let guava = install(tmp.path(), "com.google.guava:guava:31.1-jre");
        let p = project(
            r#"
[units.main]
dependencies = ["com.google.guava:guava:31.1-jre", "libs/local.jar", "/opt/ext.jar"]
"#,
            tmp.path(),
        );

        let files = p.resolve_runtime_files(&UnitName::main()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/build/classes/java/main"),
                guava,
                PathBuf::from("/p/libs/local.jar"),
                PathBuf::from("/opt/ext.jar"),
            ]
        );
    }

    #[test]
    fn test_test_unit_inherits_main() {
        let tmp = TempDir::new().unwrap();
        let guava = install(tmp.path(), "com.google.guava:guava:31.1-jre");
        let junit = install(tmp.path(), "junit:junit:4.13.2");
        let p = project(
            r#"
[units.main]
dependencies = ["com.google.guava:guava:31.1-jre"]

[units.test]
dependencies = ["junit:junit:4.13.2", "com.google.guava:guava:31.1-jre"]
"#,
            tmp.path(),
        );

        let files = p.resolve_runtime_files(&UnitName::test()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/build/classes/java/test"),
                PathBuf::from("/p/build/classes/java/main"),
                guava,
                junit,
            ]
        );
    }

    #[test]
    fn test_missing_library_fails_resolution() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            "[units.main]\ndependencies = [\"org.example:gone:1.0\", \"org.example:also-gone:2.0\"]\n",
            tmp.path(),
        );

        match p.resolve_runtime_files(&UnitName::main()).unwrap_err() {
            ResolveError::UnresolvedRuntimeFiles { unit, missing } => {
                assert_eq!(unit, UnitName::main());
                assert_eq!(missing, vec!["org.example:gone:1.0", "org.example:also-gone:2.0"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cyclic_extends_terminates() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            r#"
[units.main]
extends = ["test"]
"#,
            tmp.path(),
        );

        let files = p.resolve_runtime_files(&UnitName::main()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/build/classes/java/main"),
                PathBuf::from("/p/build/classes/java/test"),
            ]
        );
    }

    #[test]
    fn test_duplicate_edges_are_ignored() {
        let mut p = Project::new("demo", "/p", "/repo");
        p.create_unit(UnitSpec::conventional("main")).unwrap();
        let edge = DependencyEdge::library(
            UnitName::main(),
            DependencyScope::CompileOnly,
            Coordinate::new("a", "b", "1"),
        );
        p.declare_edge(edge.clone()).unwrap();
        p.declare_edge(edge).unwrap();
        assert_eq!(p.edges().len(), 1);
    }

    #[test]
    fn test_create_unit_twice_fails() {
        let mut p = Project::new("demo", "/p", "/repo");
        p.create_unit(UnitSpec::conventional("main")).unwrap();
        assert!(matches!(
            p.create_unit(UnitSpec::conventional("main")),
            Err(HostError::UnitExists(_))
        ));
    }

    #[test]
    fn test_unknown_unit() {
        let p = Project::new("demo", "/p", "/repo");
        assert!(matches!(
            p.resolve_runtime_files(&UnitName::main()),
            Err(ResolveError::UnknownUnit(_))
        ));
    }
}
