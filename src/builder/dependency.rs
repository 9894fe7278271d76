//! The pinned third-party runtime dependency of generated code.

use std::path::Path;

use anyhow::Result;

use crate::core::errors::{MissingKind, PipelineError};
use crate::util::config::Config;

/// Exact name and version of the client-runtime package to build against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPin {
    pub name: String,
    pub version: String,
}

impl DependencyPin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        DependencyPin {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Resolve the pin from configuration, with an optional override.
    ///
    /// When an install directory is configured the pinned version must be
    /// present there as `<install_dir>/<name>/<version>` (or
    /// `<install_dir>/<name>.<version>`).
    pub fn resolve(config: &Config, version_override: Option<&str>) -> Result<Self> {
        let pin = DependencyPin::new(
            config.dependency_name(),
            version_override.unwrap_or_else(|| config.dependency_version()),
        );

        if let Some(ref install_dir) = config.dependency.install_dir {
            pin.ensure_installed(install_dir)?;
        } else {
            tracing::debug!(
                "no dependency install dir configured; using {} {} as pinned",
                pin.name,
                pin.version
            );
        }

        Ok(pin)
    }

    fn ensure_installed(&self, install_dir: &Path) -> Result<(), PipelineError> {
        let nested = install_dir.join(&self.name).join(&self.version);
        let flat = install_dir.join(format!("{}.{}", self.name, self.version));

        if nested.is_dir() || flat.is_dir() {
            tracing::debug!("found {} {} in {}", self.name, self.version, install_dir.display());
            Ok(())
        } else {
            Err(PipelineError::not_found(MissingKind::Dependency, nested))
        }
    }
}
