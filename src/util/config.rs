//! Configuration file support for swagpack.
//!
//! Two configuration file locations are read:
//! - Global: `<config dir>/swagpack/config.toml` - User-wide defaults
//! - Project: `.swagpack/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every key is
//! optional; accessors supply the defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::HostPlatform;
use crate::sources::RewriteRule;

/// Default external code generator program.
pub const DEFAULT_GENERATOR: &str = "autorest";

/// Default primary-runtime compiler program.
pub const DEFAULT_COMPILER: &str = "swagpack-compile";

/// Default compiled artifact extension.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "dll";

/// The one third-party runtime package generated code depends on.
pub const DEFAULT_DEPENDENCY_NAME: &str = "Microsoft.Rest.ClientRuntime";

/// Pinned version of [`DEFAULT_DEPENDENCY_NAME`].
///
/// Newer releases conflict with a separate platform package, and existing
/// generated packages expect this one.
pub const DEFAULT_DEPENDENCY_VERSION: &str = "3.3.4";

/// swagpack configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External code generator settings
    pub generator: GeneratorConfig,

    /// Compiler settings
    pub compiler: CompilerConfig,

    /// Pinned runtime dependency
    pub dependency: DependencyConfig,

    /// Host platform settings
    pub host: HostConfig,

    /// Spec source settings
    pub sources: SourcesConfig,

    /// Manifest defaults
    pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generator program (name on PATH or full path)
    pub program: Option<PathBuf>,

    /// Directory holding the shared support files and templates
    pub support_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Primary compiler program
    pub program: Option<PathBuf>,

    /// Artifact file extension
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub name: Option<String>,

    /// Pinned version override
    pub version: Option<String>,

    /// Local package directory used to confirm the pin is installed
    pub install_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Host platform version, e.g. "5.1"
    pub platform_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Extra URL rewrite rules, applied after the built-in ones
    pub rewrite: Vec<RewriteRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Peer packages for the standard generator variant
    pub required_packages: Option<Vec<String>>,

    /// Peer packages for the cloud generator variant
    pub cloud_required_packages: Option<Vec<String>>,
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
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.generator.program.is_some() {
            self.generator.program = other.generator.program;
        }
        if other.generator.support_dir.is_some() {
            self.generator.support_dir = other.generator.support_dir;
        }

        if other.compiler.program.is_some() {
            self.compiler.program = other.compiler.program;
        }
        if other.compiler.extension.is_some() {
            self.compiler.extension = other.compiler.extension;
        }

        if other.dependency.name.is_some() {
            self.dependency.name = other.dependency.name;
        }
        if other.dependency.version.is_some() {
            self.dependency.version = other.dependency.version;
        }
        if other.dependency.install_dir.is_some() {
            self.dependency.install_dir = other.dependency.install_dir;
        }

        if other.host.platform_version.is_some() {
            self.host.platform_version = other.host.platform_version;
        }

        // Rewrite rules accumulate; global rules stay in effect
        self.sources.rewrite.extend(other.sources.rewrite);

        if other.manifest.required_packages.is_some() {
            self.manifest.required_packages = other.manifest.required_packages;
        }
        if other.manifest.cloud_required_packages.is_some() {
            self.manifest.cloud_required_packages = other.manifest.cloud_required_packages;
        }
    }

    pub fn generator_program(&self) -> PathBuf {
        self.generator
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GENERATOR))
    }

    /// Support file directory; falls back to `support/` next to the executable.
    pub fn support_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.generator.support_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("support")))
            .unwrap_or_else(|| PathBuf::from("support"))
    }

    pub fn compiler_program(&self) -> PathBuf {
        self.compiler
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER))
    }

    pub fn artifact_extension(&self) -> &str {
        self.compiler
            .extension
            .as_deref()
            .unwrap_or(DEFAULT_ARTIFACT_EXTENSION)
    }

    pub fn dependency_name(&self) -> &str {
        self.dependency.name.as_deref().unwrap_or(DEFAULT_DEPENDENCY_NAME)
    }

    pub fn dependency_version(&self) -> &str {
        self.dependency
            .version
            .as_deref()
            .unwrap_or(DEFAULT_DEPENDENCY_VERSION)
    }

    /// Parsed host platform; an unparsable value falls back to the default.
    pub fn host_platform(&self) -> HostPlatform {
        match self.host.platform_version.as_deref() {
            Some(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using default host platform", e);
                HostPlatform::default()
            }),
            None => HostPlatform::default(),
        }
    }

    /// Peer packages the manifest must require for a generator variant.
    pub fn required_packages(&self, cloud: bool) -> Vec<String> {
        let configured = if cloud {
            self.manifest.cloud_required_packages.clone()
        } else {
            self.manifest.required_packages.clone()
        };
        configured.unwrap_or_else(|| {
            let mut packages = vec!["PSSwaggerUtility".to_string()];
            if cloud {
                packages.push("AzureRM.Profile".to_string());
            }
            packages
        })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.swagpack/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}
