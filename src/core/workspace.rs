//! Workspace - central configuration hub.
//!
//! A Workspace ties together the manifest, the merged configuration and the
//! fixed output layout:
//!
//! ```text
//! <root>/build/tools/lib/<unit>.jar   packaged benchmark classes
//! <root>/build/microbench             launcher script
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{Manifest, ManifestError, MANIFEST_NAME};
use crate::core::project::{Project, BUILD_DIR};
use crate::core::unit::UnitName;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::fs::absolutize;

/// File name of the generated launcher script.
pub const SCRIPT_NAME: &str = "microbench";

/// Find the manifest in `start` or any of its parents.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}

/// A loaded project with its configuration.
#[derive(Debug)]
pub struct Workspace {
    manifest_path: PathBuf,
    manifest: Manifest,
    config: Config,
}

impl Workspace {
    /// Load a workspace from a manifest path, reading global and project config.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let manifest_path = absolutize(&cwd, manifest_path);
        let manifest = Manifest::load(&manifest_path)?;

        let config = load_config(
            global_config_path().as_deref(),
            &project_config_path(&manifest.manifest_dir),
        );

        Ok(Workspace {
            manifest_path,
            manifest,
            config,
        })
    }

    /// Find the manifest from `cwd` upward and load it.
    pub fn discover(cwd: &Path) -> Result<Self> {
        let manifest_path = find_manifest(cwd)?;
        Self::new(&manifest_path)
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Get the manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the project root directory.
    pub fn root(&self) -> &Path {
        &self.manifest.manifest_dir
    }

    /// Get the build output directory.
    pub fn build_dir(&self) -> PathBuf {
        self.root().join(BUILD_DIR)
    }

    /// Where the packaged archive of `unit` goes.
    pub fn archive_path(&self, unit: &UnitName) -> PathBuf {
        self.build_dir()
            .join("tools")
            .join("lib")
            .join(format!("{}.jar", unit))
    }

    /// Where the launcher script goes.
    pub fn script_path(&self) -> PathBuf {
        match self.config.script.path {
            Some(ref path) => absolutize(self.root(), path),
            None => self.build_dir().join(SCRIPT_NAME),
        }
    }

    /// Local repository, relative paths taken from the project root.
    pub fn local_repository(&self) -> PathBuf {
        absolutize(self.root(), &self.config.local_repository())
    }

    /// A fresh host model of the project.
    pub fn project(&self) -> Result<Project> {
        Project::from_manifest(&self.manifest, self.local_repository())
            .with_context(|| format!("invalid project in {}", self.manifest_path.display()))
    }
}
