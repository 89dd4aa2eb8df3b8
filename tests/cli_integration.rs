//! CLI integration tests for microbench.
//!
//! These run the binary against throwaway projects. Every `generate` here
//! passes `--java-version` and `--no-package`, so no JDK is needed.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the microbench binary command, isolated from the user's config.
fn microbench(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("microbench").unwrap();
    cmd.env("HOME", home).env_remove("MICROBENCH_MANIFEST");
    cmd
}

/// Create a project with the given manifest and a local repository under it.
fn create_project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Microbench.toml"), manifest).unwrap();
    fs::create_dir_all(tmp.path().join(".microbench")).unwrap();
    fs::write(
        tmp.path().join(".microbench/config.toml"),
        "[repository]\nlocal = \"repo\"\n",
    )
    .unwrap();
    tmp
}

/// Put an empty jar for `group:artifact:version` into the project's repository.
fn install(project: &Path, group: &str, artifact: &str, version: &str) {
    let dir = project
        .join("repo")
        .join(group.replace('.', "/"))
        .join(artifact)
        .join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}-{}.jar", artifact, version)), "").unwrap();
}

// ============================================================================
// microbench generate
// ============================================================================

#[test]
fn test_generate_writes_launcher() {
    let tmp = create_project(
        r#"
[project]
name = "demo"

[microbench]
jvm-options = ["-Xverify"]
"#,
    );

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let script_path = tmp.path().join("build/microbench");
    let script = fs::read_to_string(&script_path).unwrap();
    let root = tmp.path().to_string_lossy();

    assert!(script.starts_with("#!/bin/bash\n"));
    assert!(script.contains("# JMH wrapper shell script for demo for Java 17"));
    assert!(script.contains(&format!("BASE=\"{}\"", root)));
    assert!(script.contains(&format!(
        "CLASSPATH=\"{}/build/tools/lib/microbench.jar\"",
        root
    )));
    assert!(script.contains("CLASSPATH=\"${CLASSPATH}:${BASE}/build/classes/java/main\""));
    assert!(script.contains("    -Xverify \\\n    ${JVM_ARGS:--Xms2g -Xmx2g} \\\n"));
    assert!(script.contains("    org.openjdk.jmh.Main \\\n    \"$@\"\n"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&script_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o755, 0o755);
    }
}

#[test]
fn test_generate_from_subdirectory() {
    let tmp = create_project("");
    let nested = tmp.path().join("src/main/java");
    fs::create_dir_all(&nested).unwrap();

    microbench(tmp.path())
        .args(["generate", "--java-version", "11", "--no-package"])
        .current_dir(&nested)
        .assert()
        .success();

    assert!(tmp.path().join("build/microbench").exists());
}

#[test]
fn test_generate_library_on_classpath() {
    let tmp = create_project(
        r#"
[units.main]
dependencies = ["com.example:util:2.0"]
"#,
    );
    install(tmp.path(), "com.example", "util", "2.0");

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let script = fs::read_to_string(tmp.path().join("build/microbench")).unwrap();
    assert!(script.contains("${BASE}/repo/com/example/util/2.0/util-2.0.jar"));
}

#[test]
fn test_generate_dry_run_prints_script() {
    let tmp = create_project("");

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/bash"))
        .stdout(predicate::str::contains("org.openjdk.jmh.Main"));

    assert!(!tmp.path().join("build/microbench").exists());
}

#[test]
fn test_generate_java8_leaves_out_options() {
    let tmp = create_project("");

    microbench(tmp.path())
        .args([
            "generate",
            "--java-version",
            "8",
            "--no-package",
            "--dry-run",
            "--jvm-option",
            "-XX:+UseG1GC",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("for Java 8"))
        .stdout(predicate::str::contains("UseG1GC").not());
}

#[test]
fn test_generate_cli_options_replace_manifest() {
    let tmp = create_project("[microbench]\njvm-options = [\"-Xverify\"]\n");

    microbench(tmp.path())
        .args([
            "generate",
            "--java-version",
            "17",
            "--no-package",
            "--dry-run",
            "--jvm-option",
            "-ea",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("    -ea \\\n"))
        .stdout(predicate::str::contains("-Xverify").not());
}

#[test]
fn test_generate_unresolved_library_fails() {
    let tmp = create_project(
        r#"
[units.main]
dependencies = ["org.example:gone:1.0"]
"#,
    );

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("org.example:gone:1.0"));

    assert!(!tmp.path().join("build/microbench").exists());
}

#[test]
fn test_generate_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Microbench.toml"));
}

#[test]
fn test_generate_with_manifest_path() {
    let tmp = create_project("[project]\nname = \"elsewhere\"\n");
    let cwd = TempDir::new().unwrap();

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package", "--dry-run"])
        .arg("--manifest-path")
        .arg(tmp.path().join("Microbench.toml"))
        .current_dir(cwd.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("for elsewhere for Java 17"));
}

// ============================================================================
// microbench edges
// ============================================================================

#[test]
fn test_edges_lists_wiring() {
    let tmp = create_project("");

    microbench(tmp.path())
        .args(["edges"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("implementation -> test.implementation"))
        .stdout(predicate::str::contains(
            "annotationProcessor -> org.openjdk.jmh:jmh-generator-annprocess:1.21",
        ))
        .stdout(predicate::str::contains("unresolved:"));
}

#[test]
fn test_edges_json() {
    let tmp = create_project("");
    install(tmp.path(), "org.openjdk.jmh", "jmh-core", "1.36");

    let output = microbench(tmp.path())
        .args(["edges", "--json", "--jmh-version", "1.36"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["edges"].as_array().unwrap().len(), 6);
    assert_eq!(report["runtime_files"].as_array().unwrap().len(), 4);
    assert!(report["unresolved"].as_array().unwrap().is_empty());
}

// ============================================================================
// microbench clean
// ============================================================================

#[test]
fn test_clean_removes_script() {
    let tmp = create_project("");

    microbench(tmp.path())
        .args(["generate", "--java-version", "17", "--no-package"])
        .current_dir(tmp.path())
        .assert()
        .success();
    assert!(tmp.path().join("build/microbench").exists());

    microbench(tmp.path())
        .args(["clean"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed"));
    assert!(!tmp.path().join("build/microbench").exists());

    // Nothing left to remove
    microbench(tmp.path())
        .args(["clean"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed").not());
}

// ============================================================================
// microbench completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    microbench(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("microbench"));
}
