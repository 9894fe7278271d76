//! External Code Generator Adapter.
//!
//! Runs the external generator against the spec and collects the source
//! files it emitted, minus scaffolding and pre-existing cloud-client code.

use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::Pattern;

use crate::core::errors::PipelineError;
use crate::core::request::GeneratorVariant;
use crate::util::fs::{files_with_extension, matches_any, remove_dir_all_if_exists};
use crate::util::process::{ProcessBuilder, ProcessRunner};

/// Generator output directory under the package root.
pub const GENERATED_ROOT_DIR: &str = "Generated.Csharp";

/// Extension of emitted source files.
pub const SOURCE_EXTENSION: &str = "cs";

/// Generator-internal scaffolding, matched against file names.
pub const SCAFFOLD_PATTERNS: &[&str] = &["Program.cs", "AssemblyInfo.cs", "*.csproj", "project.json"];

/// Subtree holding cloud-client support code the generator copies in.
pub const CLOUD_SUBTREE: &str = "Generated.Azure.General";

pub const INPUT_FLAG: &str = "-input";
pub const CODE_GENERATOR_FLAG: &str = "-CodeGenerator";
pub const OUTPUT_DIRECTORY_FLAG: &str = "-OutputDirectory";
pub const NAMESPACE_FLAG: &str = "-NameSpace";

/// Emitted application sources, in stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFileSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl GeneratedFileSet {
    /// Generator output root the files live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute file paths.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Wraps the external generator process.
pub struct CodeGenerator<'a> {
    program: PathBuf,
    runner: &'a dyn ProcessRunner,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(program: impl Into<PathBuf>, runner: &'a dyn ProcessRunner) -> Self {
        CodeGenerator {
            program: program.into(),
            runner,
        }
    }

    /// The generator invocation, as discrete arguments.
    pub fn command(
        &self,
        spec: &Path,
        variant: GeneratorVariant,
        output: &Path,
        namespace: &str,
    ) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg(INPUT_FLAG)
            .arg(spec)
            .arg(CODE_GENERATOR_FLAG)
            .arg(variant.generator_arg())
            .arg(OUTPUT_DIRECTORY_FLAG)
            .arg(output)
            .arg(NAMESPACE_FLAG)
            .arg(namespace)
    }

    /// Generate into `output` (replacing any previous run) and collect
    /// the emitted sources.
    ///
    /// A non-zero exit is fatal; nothing is collected in that case.
    pub fn generate(
        &self,
        spec: &Path,
        variant: GeneratorVariant,
        output: &Path,
        namespace: &str,
    ) -> Result<GeneratedFileSet> {
        remove_dir_all_if_exists(output)?;

        let cmd = self.command(spec, variant, output, namespace);
        tracing::info!("Generating {} code for {}", variant, namespace);

        let result = self.runner.run(&cmd).map_err(|e| PipelineError::Generation {
            program: self.program.display().to_string(),
            status: "failure to start".to_string(),
            stderr: format!("{:#}", e),
        })?;

        if !result.success {
            return Err(PipelineError::Generation {
                program: self.program.display().to_string(),
                status: result.status_text(),
                stderr: result.combined(),
            }
            .into());
        }

        let files = collect_generated_files(output)?;
        tracing::debug!("generator emitted {} source files", files.len());
        Ok(files)
    }
}

/// Enumerate emitted sources under `root`, applying the denylist.
pub fn collect_generated_files(root: &Path) -> Result<GeneratedFileSet> {
    let patterns = SCAFFOLD_PATTERNS
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let files = files_with_extension(root, SOURCE_EXTENSION)
        .into_iter()
        .filter(|path| !is_excluded(root, path, &patterns))
        .collect();

    Ok(GeneratedFileSet {
        root: root.to_path_buf(),
        files,
    })
}

fn is_excluded(root: &Path, path: &Path, patterns: &[Pattern]) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);

    let in_cloud_subtree = rel
        .parent()
        .map(|dir| dir.components().any(|c| c.as_os_str() == CLOUD_SUBTREE))
        .unwrap_or(false);

    let is_scaffold = rel
        .file_name()
        .map(|name| matches_any(&name.to_string_lossy(), patterns))
        .unwrap_or(false);

    in_cloud_subtree || is_scaffold
}
