//! CLI integration tests for Swagpack.
//!
//! The external generator and compiler are replaced by small shell scripts
//! configured through `.swagpack/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const SPEC: &str = r#"{
  "swagger": "2.0",
  "info": { "title": "Petstore", "version": "1.0.0" },
  "paths": {
    "/pets/{petId}": { "get": { "operationId": "Pets_Get" } }
  },
  "definitions": {
    "Pet": { "type": "object", "properties": { "id": { "type": "string" } } }
  }
}"#;

const FAKE_GENERATOR: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-OutputDirectory" ]; then out="$2"; fi
  shift
done
mkdir -p "$out/Models"
echo 'public class PetstoreClient {}' > "$out/Client.cs"
echo 'public class Pet {}' > "$out/Models/Pet.cs"
echo 'static class Program {}' > "$out/Program.cs"
"#;

const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-OutputAssemblyPath" ]; then out="$2"; fi
  shift
done
echo 'MZ' > "$out"
echo 'True'
"#;

/// Get the swagpack binary command, isolated from any user config.
fn swagpack(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("swagpack").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env_remove("SWAGPACK_GENERATOR")
        .env_remove("SWAGPACK_COMPILER");
    cmd
}

/// A workspace with a spec, support files and an output directory.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("petstore.json"), SPEC).unwrap();
    fs::create_dir_all(tmp.path().join("out")).unwrap();

    let support = tmp.path().join("support");
    fs::create_dir_all(&support).unwrap();
    fs::write(support.join("GeneratedHelpers.ps1"), "# helpers\n").unwrap();
    fs::write(support.join("GeneratedHelpers.Resources.psd1"), "# resources\n").unwrap();
    fs::write(support.join("Generated.Resources.psd1"), "# localized\n").unwrap();
    tmp
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Point the project config at the fake tools.
#[cfg(unix)]
fn configure(tmp: &TempDir) {
    let generator = tmp.path().join("fake-generator.sh");
    let compiler = tmp.path().join("fake-compiler.sh");
    write_script(&generator, FAKE_GENERATOR);
    write_script(&compiler, FAKE_COMPILER);

    let config_dir = tmp.path().join(".swagpack");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "[generator]\nprogram = '{}'\nsupport_dir = '{}'\n\n[compiler]\nprogram = '{}'\n",
            generator.display(),
            tmp.path().join("support").display(),
            compiler.display()
        ),
    )
    .unwrap();
}

fn package_dir(tmp: &TempDir) -> PathBuf {
    tmp.path().join("out/Petstore/1.0.0")
}

// ============================================================================
// swagpack generate
// ============================================================================

#[test]
fn test_generate_rejects_skip_with_secondary() {
    let tmp = workspace();

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "out",
            "--name",
            "Petstore",
            "--skip-compilation",
            "--compile-secondary",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--compile-secondary"));

    assert!(!tmp.path().join("out/Petstore").exists());
}

#[test]
fn test_generate_requires_a_spec_source() {
    let tmp = workspace();

    swagpack(&tmp)
        .args(["generate", "--output", "out", "--name", "Petstore"])
        .assert()
        .failure();
}

#[test]
fn test_generate_missing_output_dir() {
    let tmp = workspace();

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "does-not-exist",
            "--name",
            "Petstore",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output directory not found"));
}

#[test]
fn test_generate_missing_spec() {
    let tmp = workspace();

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "missing.json",
            "--output",
            "out",
            "--name",
            "Petstore",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spec file not found"));
}

#[cfg(unix)]
#[test]
fn test_generate_skip_compilation_end_to_end() {
    let tmp = workspace();
    configure(&tmp);

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "out",
            "--name",
            "Petstore",
            "--version",
            "1.0.0",
            "--skip-compilation",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Finished"));

    let pkg = package_dir(&tmp);
    let manifest = fs::read_to_string(pkg.join("Petstore.psd1")).unwrap();
    assert!(manifest.contains("FunctionsToExport = @('Get-Pets', 'New-PetObject')"));
    assert!(manifest.contains("RootModule = 'Petstore.psm1'"));

    let catalog = fs::read_to_string(pkg.join("FileHashes.json")).unwrap();
    assert!(catalog.contains("\"Algorithm\": \"SHA512\""));
    assert!(catalog.contains("\"Client.cs\""));
    assert!(catalog.contains("\"Models/Pet.cs\""));
    assert!(!catalog.contains("Program.cs"));

    assert!(pkg.join("Petstore.psm1").is_file());
    assert!(pkg.join("Petstore.Resources.psd1").is_file());
    assert!(pkg.join("GeneratedHelpers.ps1").is_file());
    assert!(!pkg.join("ref").exists());
}

#[cfg(unix)]
#[test]
fn test_generate_compiles_primary_runtime() {
    let tmp = workspace();
    configure(&tmp);

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "out",
            "--name",
            "Petstore",
            "--version",
            "1.0.0",
            "--pinned-version",
            "3.3.4",
        ])
        .assert()
        .success();

    let pkg = package_dir(&tmp);
    assert!(pkg
        .join("ref/fullclr/Microsoft.PowerShell.Petstore.v100.dll")
        .is_file());
    assert!(!pkg.join("ref/coreclr").exists());

    let entry = fs::read_to_string(pkg.join("Petstore.psm1")).unwrap();
    assert!(entry.contains("$script:ClientRuntimeVersion = '3.3.4'"));
}

#[cfg(unix)]
#[test]
fn test_generate_twice_is_idempotent() {
    let tmp = workspace();
    configure(&tmp);

    let args = [
        "generate",
        "--spec-path",
        "petstore.json",
        "--output",
        "out",
        "--name",
        "Petstore",
        "--version",
        "1.0.0",
        "--skip-compilation",
    ];
    swagpack(&tmp).args(args).assert().success();
    let first = fs::read_to_string(package_dir(&tmp).join("FileHashes.json")).unwrap();

    // Passing the versioned directory itself must not nest again
    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "out/Petstore/1.0.0",
            "--name",
            "Petstore",
            "--version",
            "1.0.0",
            "--skip-compilation",
        ])
        .assert()
        .success();
    let second = fs::read_to_string(package_dir(&tmp).join("FileHashes.json")).unwrap();

    assert_eq!(first, second);
    assert!(!package_dir(&tmp).join("Petstore").exists());
}

#[cfg(unix)]
#[test]
fn test_generate_old_host_writes_flat_and_warns() {
    let tmp = workspace();
    configure(&tmp);

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "out",
            "--name",
            "Petstore",
            "--version",
            "1.0.0",
            "--skip-compilation",
            "--platform-version",
            "4.0",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").and(predicate::str::contains("4.0.0")));

    let out = tmp.path().join("out");
    assert!(out.join("Petstore.psd1").is_file());
    assert!(!out.join("Petstore").exists());
    let manifest = fs::read_to_string(out.join("Petstore.psd1")).unwrap();
    assert!(!manifest.contains("PrivateData"));
}

// ============================================================================
// swagpack verify
// ============================================================================

#[cfg(unix)]
#[test]
fn test_verify_passes_then_detects_tampering() {
    let tmp = workspace();
    configure(&tmp);

    swagpack(&tmp)
        .args([
            "generate",
            "--spec-path",
            "petstore.json",
            "--output",
            "out",
            "--name",
            "Petstore",
            "--version",
            "1.0.0",
            "--skip-compilation",
        ])
        .assert()
        .success();

    swagpack(&tmp)
        .args(["verify", "out/Petstore/1.0.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Verified"));

    fs::write(
        package_dir(&tmp).join("Generated.Csharp/Client.cs"),
        "public class Tampered {}",
    )
    .unwrap();

    swagpack(&tmp)
        .args(["verify", "out/Petstore/1.0.0", "--json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"modified\"").and(predicate::str::contains("Client.cs")));
}

#[test]
fn test_verify_without_catalog_fails() {
    let tmp = workspace();

    swagpack(&tmp)
        .args(["verify", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("integrity catalog not found"));
}

// ============================================================================
// swagpack completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = workspace();

    swagpack(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("swagpack"));
}
