//! Description Loader.
//!
//! Parses the spec, derives module metadata through the parsing
//! collaborator and settles on the package directory.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;

use crate::core::document::{SwaggerDocument, SwaggerInfo};
use crate::core::errors::PipelineError;
use crate::core::platform::HostPlatform;
use crate::core::request::GenerationRequest;
use crate::describe::{DescriptionParser, MetadataSeed};

/// A parsed description and where its package goes.
#[derive(Debug, Clone)]
pub struct LoadedDescription {
    pub document: SwaggerDocument,
    pub info: SwaggerInfo,
    /// Created, possibly versioned, package root
    pub output_dir: PathBuf,
}

/// Load `spec` and prepare the package directory for `request`.
pub fn load_description(
    spec: &Path,
    request: &GenerationRequest,
    parser: &dyn DescriptionParser,
    platform: &HostPlatform,
) -> Result<LoadedDescription> {
    let document = SwaggerDocument::load(spec)?;

    let seed = MetadataSeed {
        name: &request.name,
        version: &request.version,
        prefix: request.prefix.as_deref(),
    };
    let info = parser
        .module_metadata(&document, &seed)
        .with_context(|| format!("failed to derive module metadata from {}", spec.display()))?;

    let output_dir = resolve_output_dir(&request.output, &request.name, &request.version, platform);
    std::fs::create_dir_all(&output_dir).map_err(|e| PipelineError::io(&output_dir, e))?;
    tracing::debug!("package directory: {}", output_dir.display());

    Ok(LoadedDescription {
        document,
        info,
        output_dir,
    })
}

/// The package root for `output`.
///
/// Hosts with versioned module directories get `<output>/<name>/<version>`,
/// unless `output` already ends in `<name>` or `<name>/<version>`
/// (compared case-insensitively). Older hosts use `output` as-is.
pub fn resolve_output_dir(
    output: &Path,
    name: &str,
    version: &Version,
    platform: &HostPlatform,
) -> PathBuf {
    if !platform.uses_versioned_dirs() {
        return output.to_path_buf();
    }

    let version = version.to_string();
    if ends_with_ignore_case(output, &[name, &version]) {
        output.to_path_buf()
    } else if ends_with_ignore_case(output, &[name]) {
        output.join(version)
    } else {
        output.join(name).join(version)
    }
}

fn ends_with_ignore_case(path: &Path, suffix: &[&str]) -> bool {
    let components: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect();

    if components.len() < suffix.len() {
        return false;
    }

    components[components.len() - suffix.len()..]
        .iter()
        .zip(suffix)
        .all(|(have, want)| *have == want.to_lowercase())
}
