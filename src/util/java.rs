//! Java toolchain detection.
//!
//! Finds `java` and `jar`, and works out the runtime's major version. The
//! major version decides whether the launcher may pass JVM options at all.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::util::config::JavaConfig;
use crate::util::process::{find_executable, ProcessBuilder};

/// First Java release whose command line accepts the modern option syntax.
pub const MODERN_OPTIONS_SINCE: u32 = 11;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"version "(\d+)(?:\.(\d+))?[^"]*""#).expect("valid version regex")
});

/// A Java major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JavaVersion {
    major: u32,
}

impl JavaVersion {
    pub fn new(major: u32) -> Self {
        JavaVersion { major }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    /// Parse `java -version` output.
    ///
    /// Handles both `1.8.0_292` (legacy, major is the second number) and
    /// `17.0.2` / `21` style strings.
    pub fn parse(output: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(output)?;
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        let major = match (first, caps.get(2)) {
            (1, Some(second)) => second.as_str().parse().ok()?,
            _ => first,
        };
        Some(JavaVersion { major })
    }

    /// Whether this runtime understands the modern option syntax.
    pub fn is_java11_compatible(&self) -> bool {
        self.major >= MODERN_OPTIONS_SINCE
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)
    }
}

/// Located JDK tools.
#[derive(Debug, Clone)]
pub struct JavaToolchain {
    java: PathBuf,
    jar: PathBuf,
}

impl JavaToolchain {
    /// Detect the toolchain.
    ///
    /// Priority:
    /// 1. `[java] home` from config
    /// 2. `JAVA_HOME`
    /// 3. `java` / `jar` on PATH
    pub fn detect(config: &JavaConfig) -> Result<Self> {
        if let Some(ref home) = config.home {
            if let Some(tc) = Self::from_home(home) {
                tracing::debug!("using JDK from config: {}", home.display());
                return Ok(tc);
            }
            tracing::warn!("Configured JDK not usable: {}", home.display());
        }

        if let Some(home) = std::env::var_os("JAVA_HOME") {
            let home = PathBuf::from(home);
            if let Some(tc) = Self::from_home(&home) {
                tracing::debug!("using JDK from JAVA_HOME: {}", home.display());
                return Ok(tc);
            }
        }

        match (find_executable("java"), find_executable("jar")) {
            (Some(java), Some(jar)) => Ok(JavaToolchain { java, jar }),
            _ => bail!(
                "no JDK found\n\
                 \n\
                 microbench needs `java` and `jar` from a JDK.\n\
                 Set JAVA_HOME, configure [java] home, or put a JDK on PATH."
            ),
        }
    }

    fn from_home(home: &Path) -> Option<Self> {
        let bin = home.join("bin");
        let java = bin.join(exe("java"));
        let jar = bin.join(exe("jar"));
        (java.is_file() && jar.is_file()).then_some(JavaToolchain { java, jar })
    }

    pub fn jar(&self) -> &Path {
        &self.jar
    }

    /// Run `java -version` and parse the result.
    pub fn version(&self) -> Result<JavaVersion> {
        let output = ProcessBuilder::new(&self.java)
            .arg("-version")
            .exec_and_check()?;

        // `java -version` prints to stderr; some vendors use stdout
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
        JavaVersion::parse(&text)
            .with_context(|| format!("could not parse `{} -version` output", self.java.display()))
    }
}

fn exe(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_version() {
        let out = "java version \"1.8.0_292\"\nJava(TM) SE Runtime Environment (build 1.8.0_292-b10)\n";
        assert_eq!(JavaVersion::parse(out), Some(JavaVersion::new(8)));
        assert!(!JavaVersion::new(8).is_java11_compatible());
    }

    #[test]
    fn test_parse_modern_versions() {
        let out = "openjdk version \"17.0.2\" 2022-01-18\nOpenJDK Runtime Environment\n";
        assert_eq!(JavaVersion::parse(out), Some(JavaVersion::new(17)));

        let out = "openjdk version \"21\" 2023-09-19\n";
        assert_eq!(JavaVersion::parse(out), Some(JavaVersion::new(21)));

        let out = "openjdk version \"11.0.20.1\" 2023-08-24\n";
        let v = JavaVersion::parse(out).unwrap();
        assert_eq!(v.major(), 11);
        assert!(v.is_java11_compatible());
    }

    #[test]
    fn test_parse_early_access() {
        let out = "openjdk version \"22-ea\" 2024-03-19\n";
        assert_eq!(JavaVersion::parse(out), Some(JavaVersion::new(22)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(JavaVersion::parse("command not found"), None);
    }

    #[test]
    fn test_from_home_requires_both_tools() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("bin")).unwrap();
        std::fs::write(tmp.path().join("bin").join(exe("java")), "").unwrap();
        assert!(JavaToolchain::from_home(tmp.path()).is_none());

        std::fs::write(tmp.path().join("bin").join(exe("jar")), "").unwrap();
        let tc = JavaToolchain::from_home(tmp.path()).unwrap();
        assert!(tc.jar().ends_with(exe("jar")));
    }
}
