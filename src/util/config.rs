//! Configuration file support for microbench.
//!
//! Two configuration file locations are read:
//! - Global: `~/.microbench/config.toml` - User-wide defaults
//! - Project: `.microbench/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Harness settings
//! (JMH version, JVM options) live in the manifest, not here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// microbench configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Java toolchain settings
    pub java: JavaConfig,

    /// Dependency repository settings
    pub repository: RepositoryConfig,

    /// Launcher script settings
    pub script: ScriptConfig,
}

/// Java toolchain configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaConfig {
    /// JDK home; `bin/java` and `bin/jar` are taken from here
    pub home: Option<PathBuf>,
}

/// Repository configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Maven-layout directory that library coordinates resolve against
    pub local: Option<PathBuf>,
}

/// Launcher script configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Output path, relative to the project root
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.java.home.is_some() {
            self.java.home = other.java.home;
        }
        if other.repository.local.is_some() {
            self.repository.local = other.repository.local;
        }
        if other.script.path.is_some() {
            self.script.path = other.script.path;
        }
    }

    /// The local repository, falling back to `~/.m2/repository`.
    pub fn local_repository(&self) -> PathBuf {
        self.repository.local.clone().unwrap_or_else(default_local_repository)
    }
}

/// `~/.m2/repository`, or a relative `.m2/repository` when no home is known.
pub fn default_local_repository() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().join(".m2").join("repository"))
        .unwrap_or_else(|| PathBuf::from(".m2").join("repository"))
}

/// Get the global microbench config directory (~/.microbench).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".microbench"))
}

/// Get the global config path (~/.microbench/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.microbench/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".microbench").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.microbench/config.toml)
/// 2. Global config (~/.microbench/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
