//! Runtime targets and their compiled artifact locations.

use std::fmt;
use std::path::{Path, PathBuf};

/// A binary-compatible execution environment for the compiled module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeTarget {
    /// The orchestrator's own runtime ("full").
    Primary,
    /// The alternate runtime ("core"), compiled with a separate toolchain.
    Secondary,
}

impl RuntimeTarget {
    /// Directory tag under `ref/`.
    pub fn tag(&self) -> &'static str {
        match self {
            RuntimeTarget::Primary => "fullclr",
            RuntimeTarget::Secondary => "coreclr",
        }
    }

    /// Fixed artifact path: `<root>/ref/<tag>/<namespace>.<ext>`.
    pub fn artifact_path(&self, root: &Path, namespace: &str, extension: &str) -> PathBuf {
        root.join("ref")
            .join(self.tag())
            .join(format!("{}.{}", namespace, extension))
    }
}

impl fmt::Display for RuntimeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A successfully compiled binary module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub target: RuntimeTarget,
    pub path: PathBuf,
}
