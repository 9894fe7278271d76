//! Pipeline error taxonomy.
//!
//! Every stage failure is fatal to the run. Stages raise these through
//! `anyhow`, so callers can recover the kind with `downcast_ref`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// What a [`PipelineError::NotFound`] was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    /// The spec file (local, or resolved from a download).
    SpecPath,
    /// The caller-supplied output directory.
    OutputPath,
    /// The secondary runtime toolchain executable.
    Toolchain,
    /// A support file expected in the generator's install location.
    SupportFile,
    /// The pinned dependency in the local install directory.
    Dependency,
    /// A package's integrity catalog.
    Catalog,
}

impl fmt::Display for MissingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingKind::SpecPath => write!(f, "spec file"),
            MissingKind::OutputPath => write!(f, "output directory"),
            MissingKind::Toolchain => write!(f, "secondary toolchain"),
            MissingKind::SupportFile => write!(f, "support file"),
            MissingKind::Dependency => write!(f, "pinned dependency"),
            MissingKind::Catalog => write!(f, "integrity catalog"),
        }
    }
}

/// A fatal pipeline error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid option combination: {0}")]
    Configuration(String),

    #[error("{what} not found: {}", path.display())]
    NotFound { what: MissingKind, path: PathBuf },

    #[error("failed to fetch spec from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("code generator `{program}` failed with {status}\n{stderr}")]
    Generation {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("compilation of {} failed\n{output}", artifact.display())]
    Compilation { artifact: PathBuf, output: String },

    #[error("i/o failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    pub fn not_found(what: MissingKind, path: impl Into<PathBuf>) -> Self {
        PipelineError::NotFound {
            what,
            path: path.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
