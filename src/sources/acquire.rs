//! Spec Acquirer.
//!
//! Resolves the request's spec source to a local file. Remote documents
//! are downloaded to a uniquely named `.json` temp file that lives as long
//! as the returned [`AcquiredSpec`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tempfile::TempPath;
use url::Url;

use crate::core::errors::{MissingKind, PipelineError};
use crate::core::request::SpecSource;
use crate::sources::http::Fetcher;

/// Host rewrite from a web front-end to its raw-content host.
///
/// The path, query and fragment are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub from_host: String,
    pub to_host: String,
}

impl RewriteRule {
    pub fn new(from_host: impl Into<String>, to_host: impl Into<String>) -> Self {
        RewriteRule {
            from_host: from_host.into(),
            to_host: to_host.into(),
        }
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.from_host))
            .unwrap_or(false)
    }
}

/// Rules applied before any configured ones.
pub fn builtin_rewrite_rules() -> Vec<RewriteRule> {
    vec![RewriteRule::new("github.com", "raw.githubusercontent.com")]
}

/// Apply the first matching rule, or return the URL unchanged.
pub fn rewrite_uri(url: &Url, rules: &[RewriteRule]) -> Url {
    let Some(rule) = rules.iter().find(|r| r.matches(url)) else {
        return url.clone();
    };

    let mut rewritten = url.clone();
    match rewritten.set_host(Some(&rule.to_host)) {
        Ok(()) => {
            tracing::debug!("rewrote {} -> {}", url, rewritten);
            rewritten
        }
        Err(e) => {
            tracing::warn!("ignoring rewrite rule to `{}`: {}", rule.to_host, e);
            url.clone()
        }
    }
}

/// A spec file ready to read.
///
/// Downloaded specs are deleted when this value is dropped.
#[derive(Debug)]
pub struct AcquiredSpec {
    path: PathBuf,
    download: Option<TempPath>,
}

impl AcquiredSpec {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_download(&self) -> bool {
        self.download.is_some()
    }
}

/// Resolve `source` to a local spec file and check the output directory.
///
/// The output directory is checked first so a bad output path never costs
/// a download.
pub fn acquire_spec(
    source: &SpecSource,
    output: &Path,
    fetcher: &dyn Fetcher,
    rules: &[RewriteRule],
) -> Result<AcquiredSpec, PipelineError> {
    if !output.is_dir() {
        return Err(PipelineError::not_found(MissingKind::OutputPath, output));
    }

    let acquired = match source {
        SpecSource::Path(path) => AcquiredSpec {
            path: path.clone(),
            download: None,
        },
        SpecSource::Uri(url) => fetch_remote(url, fetcher, rules)?,
    };

    if !acquired.path.is_file() {
        return Err(PipelineError::not_found(MissingKind::SpecPath, &acquired.path));
    }

    Ok(acquired)
}

fn fetch_remote(
    url: &Url,
    fetcher: &dyn Fetcher,
    rules: &[RewriteRule],
) -> Result<AcquiredSpec, PipelineError> {
    let target = rewrite_uri(url, rules);
    tracing::info!("Fetching spec from {}", target);

    let fetch_err = |message: String| PipelineError::Fetch {
        url: target.to_string(),
        message,
    };

    let mut file = tempfile::Builder::new()
        .prefix("swagpack-spec-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| fetch_err(format!("could not create temp file: {}", e)))?;

    // On failure `file` is dropped here, which removes the partial download
    fetcher
        .fetch(&target, file.as_file_mut())
        .map_err(|e| fetch_err(format!("{:#}", e)))?;

    let temp_path = file.into_temp_path();
    Ok(AcquiredSpec {
        path: temp_path.to_path_buf(),
        download: Some(temp_path),
    })
}
