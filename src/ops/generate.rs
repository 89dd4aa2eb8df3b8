//! The full pipeline: provision, package, resolve, generate.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::host::ProjectHost;
use crate::core::manifest::MicrobenchSettings;
use crate::core::unit::UnitName;
use crate::core::workspace::Workspace;
use crate::ops::launcher::{assemble, write_script, GenerateError, LauncherInputs};
use crate::ops::package::package_unit;
use crate::ops::provision::provision;
use crate::util::java::{JavaToolchain, JavaVersion};

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Harness settings after CLI overrides
    pub settings: MicrobenchSettings,

    /// Java major version to generate for; detected from the JDK when `None`
    pub java_version: Option<u32>,

    /// Run `jar` to package the benchmark classes
    pub package: bool,

    /// Build the script text but write nothing
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            settings: MicrobenchSettings::default(),
            java_version: None,
            package: true,
            dry_run: false,
        }
    }
}

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerateResult {
    /// Script text
    pub script: String,
    /// Where the script goes
    pub script_path: PathBuf,
    /// Where the packaged archive is
    pub archive: PathBuf,
    /// Whether `archive` was (re)built by this run
    pub packaged: bool,
    /// Java version the script was generated for
    pub java_version: JavaVersion,
    /// Whether the script was written
    pub written: bool,
}

/// Apply CLI overrides on top of the manifest's `[microbench]` block.
///
/// A non-empty `jvm_options` list replaces the manifest list as a whole.
pub fn effective_settings(
    manifest: &MicrobenchSettings,
    jmh_version: Option<String>,
    jvm_options: Vec<String>,
) -> MicrobenchSettings {
    MicrobenchSettings {
        jmh_version: jmh_version.unwrap_or_else(|| manifest.jmh_version.clone()),
        jvm_options: if jvm_options.is_empty() {
            manifest.jvm_options.clone()
        } else {
            jvm_options
        },
    }
}

/// Generate the launcher script for the workspace.
///
/// Everything that can fail on the project's inputs runs before the archive
/// or the script is touched, so a failed run leaves both as they were.
pub fn generate(ws: &Workspace, opts: &GenerateOptions) -> Result<GenerateResult> {
    let mut project = ws.project()?;
    let aux = UnitName::microbench();

    provision(
        &mut project,
        &aux,
        &UnitName::main(),
        &UnitName::test(),
        &opts.settings.jmh_version,
    )?;

    let mut toolchain = None;
    let java_version = match opts.java_version {
        Some(major) => JavaVersion::new(major),
        None => toolchain
            .insert(JavaToolchain::detect(&ws.config().java)?)
            .version()?,
    };
    let supports_modern_option_syntax = java_version.is_java11_compatible();
    if !supports_modern_option_syntax && !opts.settings.jvm_options.is_empty() {
        tracing::debug!(
            "Java {} predates {}; leaving out {} JVM option(s)",
            java_version,
            crate::util::java::MODERN_OPTIONS_SINCE,
            opts.settings.jvm_options.len()
        );
    }

    let runtime_files = project
        .resolve_runtime_files(&UnitName::main())
        .map_err(GenerateError::from)?;

    let archive = ws.archive_path(&aux);
    let script = assemble(&LauncherInputs {
        project_name: project.name(),
        project_root: project.root(),
        packaged_artifact: &archive,
        runtime_files: &runtime_files,
        settings: &opts.settings,
        java_major_version: java_version.major(),
        supports_modern_option_syntax,
    });

    let script_path = ws.script_path();
    if opts.dry_run {
        return Ok(GenerateResult {
            script,
            script_path,
            archive,
            packaged: false,
            java_version,
            written: false,
        });
    }

    if opts.package {
        let tc = match toolchain {
            Some(tc) => tc,
            None => JavaToolchain::detect(&ws.config().java)?,
        };
        package_unit(&project, &aux, &archive, tc.jar())?;
    }

    write_script(&script_path, &script)
        .with_context(|| format!("while generating the launcher for {}", project.name()))?;

    Ok(GenerateResult {
        script,
        script_path,
        archive,
        packaged: opts.package,
        java_version,
        written: true,
    })
}
