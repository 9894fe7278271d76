//! Implementation of `swagpack verify`.
//!
//! Re-hashes a generated package against its integrity catalog.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::generator::{collect_generated_files, GENERATED_ROOT_DIR};
use crate::core::catalog::{catalog_key, IntegrityCatalog, CATALOG_FILE};
use crate::core::errors::{MissingKind, PipelineError};
use crate::util::hash::sha512_file;

/// Output format for verification results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

/// Outcome of checking one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub package_dir: PathBuf,

    /// SHA-512 of the catalog file itself
    pub catalog_hash: String,

    /// Number of catalog entries checked
    pub checked: usize,

    /// Listed in the catalog but absent on disk
    pub missing: Vec<String>,

    /// Present but with a different hash
    pub modified: Vec<String>,

    /// Generated sources on disk the catalog does not list
    pub untracked: Vec<String>,

    /// Catalog keys that point outside the generation root
    pub invalid: Vec<String>,

    pub passed: bool,
}

/// Verify the package rooted at `package_dir`.
pub fn verify(package_dir: &Path) -> Result<VerifyReport> {
    let catalog_path = package_dir.join(CATALOG_FILE);
    if !catalog_path.is_file() {
        return Err(PipelineError::not_found(MissingKind::Catalog, catalog_path).into());
    }

    let catalog = IntegrityCatalog::load(&catalog_path)?;
    let catalog_hash = sha512_file(&catalog_path)?;
    let root = package_dir.join(GENERATED_ROOT_DIR);

    let mut report = VerifyReport {
        package_dir: package_dir.to_path_buf(),
        catalog_hash,
        checked: catalog.len(),
        ..Default::default()
    };

    for (key, expected) in catalog.entries() {
        if !is_contained_key(key) {
            tracing::warn!("catalog key `{}` escapes the generation root", key);
            report.invalid.push(key.to_string());
            continue;
        }
        let path = root.join(key);
        if !path.is_file() {
            report.missing.push(key.to_string());
            continue;
        }
        let actual = sha512_file(&path)?;
        if !actual.eq_ignore_ascii_case(expected) {
            tracing::debug!("hash mismatch for {}: {} != {}", key, actual, expected);
            report.modified.push(key.to_string());
        }
    }

    if root.is_dir() {
        let on_disk = collect_generated_files(&root)?;
        report.untracked = on_disk
            .files()
            .iter()
            .map(|f| catalog_key(&root, f))
            .filter(|key| catalog.get(key).is_none())
            .collect();
    }

    report.passed = report.missing.is_empty()
        && report.modified.is_empty()
        && report.untracked.is_empty()
        && report.invalid.is_empty();
    Ok(report)
}

/// A key is usable only as a plain relative path: no `..`, no root or prefix.
fn is_contained_key(key: &str) -> bool {
    !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Render a report in the requested format.
pub fn format_report(report: &VerifyReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(report),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
            json.push('\n');
            json
        }
    }
}

fn format_human(report: &VerifyReport) -> String {
    let mut out = String::new();
    for (label, keys) in [
        ("missing", &report.missing),
        ("modified", &report.modified),
        ("untracked", &report.untracked),
        ("invalid", &report.invalid),
    ] {
        for key in keys {
            let _ = writeln!(out, "{:>12} {}", label, key);
        }
    }
    out
}
