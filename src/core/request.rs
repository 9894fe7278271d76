//! The per-invocation generation request and its option validation.

use std::fmt;
use std::path::PathBuf;

use semver::Version;
use url::Url;

use crate::core::errors::PipelineError;

/// Where the spec document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// A remote document to download first.
    Uri(Url),
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecSource::Path(p) => write!(f, "{}", p.display()),
            SpecSource::Uri(u) => write!(f, "{}", u),
        }
    }
}

/// Which code generator flavour the external generator should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorVariant {
    #[default]
    Standard,
    /// Cloud-specific conventions (Azure).
    Cloud,
}

impl GeneratorVariant {
    /// Argument value passed to the generator's `-CodeGenerator` switch.
    pub fn generator_arg(&self) -> &'static str {
        match self {
            GeneratorVariant::Standard => "CSharp",
            GeneratorVariant::Cloud => "Azure.CSharp",
        }
    }

    pub fn is_cloud(&self) -> bool {
        matches!(self, GeneratorVariant::Cloud)
    }
}

impl fmt::Display for GeneratorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.generator_arg())
    }
}

/// Everything one `generate` run needs. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Spec document source (local path XOR remote URI)
    pub source: SpecSource,

    /// Output directory (must already exist)
    pub output: PathBuf,

    /// Package (module) name
    pub name: String,

    /// Package version
    pub version: Version,

    /// Optional prefix for exported command nouns
    pub prefix: Option<String>,

    /// Generator flavour
    pub variant: GeneratorVariant,

    /// Skip compiling generated code into binary artifacts
    pub skip_compilation: bool,

    /// Also compile for the secondary runtime
    pub compile_secondary: bool,

    /// Toolchain for the secondary runtime (file or containing directory)
    pub secondary_toolchain: Option<PathBuf>,

    /// Pass the optimization-disable flag to the primary compiler
    pub disable_optimizations: bool,
}

impl GenerationRequest {
    /// Create a request with default flags.
    pub fn new(
        source: SpecSource,
        output: impl Into<PathBuf>,
        name: impl Into<String>,
        version: Version,
    ) -> Self {
        GenerationRequest {
            source,
            output: output.into(),
            name: name.into(),
            version,
            prefix: None,
            variant: GeneratorVariant::Standard,
            skip_compilation: false,
            compile_secondary: false,
            secondary_toolchain: None,
            disable_optimizations: false,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_variant(mut self, variant: GeneratorVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn skip_compilation(mut self, skip: bool) -> Self {
        self.skip_compilation = skip;
        self
    }

    pub fn compile_secondary(mut self, toolchain: Option<PathBuf>) -> Self {
        self.compile_secondary = true;
        self.secondary_toolchain = toolchain;
        self
    }

    pub fn disable_optimizations(mut self, disable: bool) -> Self {
        self.disable_optimizations = disable;
        self
    }

    /// Reject contradictory option combinations.
    ///
    /// Pure check, performs no I/O. Must run before anything touches the
    /// filesystem or network.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.name.trim().is_empty() {
            return Err(PipelineError::Configuration(
                "package name must not be empty".into(),
            ));
        }

        if let Some(ref prefix) = self.prefix {
            if prefix.trim().is_empty() {
                return Err(PipelineError::Configuration(
                    "command prefix must not be empty when given".into(),
                ));
            }
        }

        if !self.skip_compilation {
            return Ok(());
        }

        let conflicts: Vec<&str> = [
            (self.compile_secondary, "--compile-secondary"),
            (self.secondary_toolchain.is_some(), "--secondary-toolchain"),
            (self.disable_optimizations, "--disable-optimizations"),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect();

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Configuration(format!(
                "--skip-compilation cannot be combined with {}",
                conflicts.join(", ")
            )))
        }
    }
}
