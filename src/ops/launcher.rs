//! Launcher script generation.
//!
//! [`assemble`] is a pure function of its inputs: the same project root,
//! archive, runtime files and settings always give the same bytes.
//! [`write_script`] puts the text on disk atomically with the executable bit
//! set.
//!
//! The generated script looks like this:
//!
//! ```text
//! BASE="/p"
//!
//! CLASSPATH="/p/build/tools/lib/microbench.jar"
//! CLASSPATH="${CLASSPATH}:${BASE}/test/conf"
//! CLASSPATH="${CLASSPATH}:${BASE}/build/classes/java/main"
//! CLASSPATH="${CLASSPATH}:/home/u/.m2/repository/.../guava-31.1-jre.jar"
//!
//! java -cp "${CLASSPATH}" \
//!     -XX:+UseG1GC \
//!     ${JVM_ARGS:--Xms2g -Xmx2g} \
//!     org.openjdk.jmh.Main \
//!     "$@"
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::host::ResolveError;
use crate::core::manifest::MicrobenchSettings;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{absolutize, is_inside, normalize_lexically, relative_path, to_slash, write_executable};

/// Auxiliary configuration directory, relative to the project root.
pub const AUX_CONF_DIR: &str = "test/conf";

/// Harness entry point.
pub const HARNESS_MAIN: &str = "org.openjdk.jmh.Main";

/// Environment variable read by the script at run time.
pub const JVM_ARGS_VAR: &str = "JVM_ARGS";

/// Heap sizing used when `JVM_ARGS` is unset.
pub const DEFAULT_JVM_ARGS: &str = "-Xms2g -Xmx2g";

/// Variable the script binds to the project root.
pub const BASE_VAR: &str = "BASE";

/// Error while generating the launcher script.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    UnresolvedRuntimeFiles(#[from] ResolveError),

    #[error("failed to write launcher script `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GenerateError::UnresolvedRuntimeFiles(e) => e.to_diagnostic(),
            GenerateError::Write { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::WRITE_FAILED),
        }
    }
}

/// One class-path location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// Below the project root; stored as a `/`-separated relative path
    ProjectRelative(String),
    /// Anywhere else
    Absolute(PathBuf),
}

impl ClasspathEntry {
    /// Classify `path` relative to `root`. Both are normalized lexically first.
    pub fn classify(root: &Path, path: &Path) -> Self {
        let root = normalize_lexically(root);
        let path = absolutize(&root, path);
        if is_inside(&path, &root) {
            ClasspathEntry::ProjectRelative(to_slash(&relative_path(&root, &path)))
        } else {
            ClasspathEntry::Absolute(path)
        }
    }

    /// Render for use inside a double-quoted shell string.
    pub fn render(&self) -> String {
        match self {
            ClasspathEntry::ProjectRelative(rel) if rel.is_empty() => format!("${{{}}}", BASE_VAR),
            ClasspathEntry::ProjectRelative(rel) => {
                format!("${{{}}}/{}", BASE_VAR, escape_double_quoted(rel))
            }
            ClasspathEntry::Absolute(path) => escape_double_quoted(&path.to_string_lossy()),
        }
    }
}

/// Everything the generator needs for one run.
#[derive(Debug, Clone)]
pub struct LauncherInputs<'a> {
    /// Shown in the header
    pub project_name: &'a str,
    /// Bound to `BASE`
    pub project_root: &'a Path,
    /// Always the first class-path entry
    pub packaged_artifact: &'a Path,
    /// In resolution order
    pub runtime_files: &'a [PathBuf],
    pub settings: &'a MicrobenchSettings,
    /// Shown in the header
    pub java_major_version: u32,
    /// When false, the configured JVM options are left out
    pub supports_modern_option_syntax: bool,
}

/// The class-path as rendered entries, archive first.
pub fn classpath(inputs: &LauncherInputs<'_>) -> Vec<String> {
    let root = normalize_lexically(inputs.project_root);

    let mut entries = vec![escape_double_quoted(
        &absolutize(&root, inputs.packaged_artifact).to_string_lossy(),
    )];
    entries.push(ClasspathEntry::classify(&root, Path::new(AUX_CONF_DIR)).render());
    entries.extend(
        inputs
            .runtime_files
            .iter()
            .map(|f| ClasspathEntry::classify(&root, f).render()),
    );
    entries
}

/// Build the launcher script text.
pub fn assemble(inputs: &LauncherInputs<'_>) -> String {
    let root = normalize_lexically(inputs.project_root);
    let entries = classpath(inputs);

    let mut script = String::new();
    script.push_str("#!/bin/bash\n");
    script.push_str("#\n");
    script.push_str("# GENERATED FILE\n");
    script.push_str("#\n");
    let _ = writeln!(
        script,
        "# JMH wrapper shell script for {} for Java {}",
        single_line(inputs.project_name),
        inputs.java_major_version
    );
    script.push_str("#\n");
    script.push_str(
        "# DO NOT EDIT, ALL CHANGES IN THE ORIGINAL LOCATION WILL BE OVERWRITTEN (or copy it to a safe place)\n",
    );
    script.push_str("#\n\n");

    let _ = writeln!(
        script,
        "{}=\"{}\"\n",
        BASE_VAR,
        escape_double_quoted(&root.to_string_lossy())
    );

    let mut entries = entries.into_iter();
    if let Some(first) = entries.next() {
        let _ = writeln!(script, "CLASSPATH=\"{}\"", first);
    }
    for entry in entries {
        let _ = writeln!(script, "CLASSPATH=\"${{CLASSPATH}}:{}\"", entry);
    }
    script.push('\n');

    script.push_str("java -cp \"${CLASSPATH}\" \\\n");
    if inputs.supports_modern_option_syntax {
        for option in &inputs.settings.jvm_options {
            let _ = writeln!(script, "    {} \\", shell_word(option));
        }
    }
    let _ = writeln!(script, "    ${{{}:-{}}} \\", JVM_ARGS_VAR, DEFAULT_JVM_ARGS);
    let _ = writeln!(script, "    {} \\", HARNESS_MAIN);
    script.push_str("    \"$@\"\n");

    script
}

/// Atomically write `script` to `path` and mark it executable.
///
/// On failure any previous file at `path` keeps its content.
pub fn write_script(path: &Path, script: &str) -> Result<PathBuf, GenerateError> {
    write_executable(path, script).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote executable {}", path.display());
    Ok(path.to_path_buf())
}

/// Escape text for the inside of a double-quoted shell string.
fn escape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A command-line token: verbatim when it is shell-safe, single-quoted otherwise.
fn shell_word(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=+:,./@%".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// Keep a header value on one comment line.
fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}
