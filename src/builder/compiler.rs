//! Dual-Runtime Compiler.
//!
//! Compiles the generated sources into one binary module per runtime
//! target. Each compilation runs in its own subprocess: the two runtimes'
//! toolchains cannot share a process, and a crashing compiler must not
//! take the orchestrator down with it. Targets are compiled one after the
//! other, primary first.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::dependency::DependencyPin;
use crate::builder::generator::GeneratedFileSet;
use crate::core::errors::{MissingKind, PipelineError};
use crate::core::request::GeneratorVariant;
use crate::core::runtime::{CompiledArtifact, RuntimeTarget};
use crate::util::fs::{ensure_dir, remove_file_if_exists};
use crate::util::process::{ProcessBuilder, ProcessRunner};

/// A compile reports success when its last output token ends with this.
pub const SUCCESS_MARKER: &str = "True";

/// Executable looked up inside a secondary toolchain directory.
#[cfg(windows)]
pub const SECONDARY_EXECUTABLE: &str = "pwsh.exe";
#[cfg(not(windows))]
pub const SECONDARY_EXECUTABLE: &str = "pwsh";

pub const OUTPUT_FLAG: &str = "-OutputAssemblyPath";
pub const VARIANT_FLAG: &str = "-CodeGenerator";
pub const DEPENDENCY_VERSION_FLAG: &str = "-ClientRuntimeVersion";
pub const DISABLE_OPTIMIZATIONS_FLAG: &str = "-DisableOptimizations";
pub const SOURCES_FLAG: &str = "-SourceFiles";

/// Which targets to compile and how.
#[derive(Debug, Clone)]
pub struct CompileOptions<'a> {
    /// Package root; artifacts go under `ref/`
    pub package_root: &'a Path,
    pub namespace: &'a str,
    pub variant: GeneratorVariant,
    pub pin: &'a DependencyPin,
    pub disable_optimizations: bool,
    pub compile_secondary: bool,
    pub secondary_toolchain: Option<&'a Path>,
}

impl CompileOptions<'_> {
    fn wants_secondary(&self) -> bool {
        self.compile_secondary || self.secondary_toolchain.is_some()
    }
}

/// Drives the primary and secondary compilers.
pub struct DualRuntimeCompiler<'a> {
    primary: PathBuf,
    extension: String,
    runner: &'a dyn ProcessRunner,
}

impl<'a> DualRuntimeCompiler<'a> {
    pub fn new(
        primary: impl Into<PathBuf>,
        extension: impl Into<String>,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        DualRuntimeCompiler {
            primary: primary.into(),
            extension: extension.into(),
            runner,
        }
    }

    /// Compile the primary target, then the secondary one if requested.
    pub fn compile_all(
        &self,
        sources: &GeneratedFileSet,
        opts: &CompileOptions<'_>,
    ) -> Result<Vec<CompiledArtifact>> {
        let mut artifacts = Vec::new();

        let primary_args = CompileArgs {
            pinned_version: Some(opts.pin.version.as_str()),
            disable_optimizations: opts.disable_optimizations,
        };
        artifacts.push(self.compile(
            &self.primary,
            RuntimeTarget::Primary,
            sources,
            opts,
            &primary_args,
        )?);

        if opts.wants_secondary() {
            let toolchain = resolve_toolchain(opts.secondary_toolchain)?;
            // The secondary runtime resolves its own dependency graph
            let secondary_args = CompileArgs {
                pinned_version: None,
                disable_optimizations: false,
            };
            artifacts.push(self.compile(
                &toolchain,
                RuntimeTarget::Secondary,
                sources,
                opts,
                &secondary_args,
            )?);
        }

        Ok(artifacts)
    }

    fn compile(
        &self,
        program: &Path,
        target: RuntimeTarget,
        sources: &GeneratedFileSet,
        opts: &CompileOptions<'_>,
        args: &CompileArgs<'_>,
    ) -> Result<CompiledArtifact> {
        let artifact = target.artifact_path(opts.package_root, opts.namespace, &self.extension);

        // Never reuse a previous build
        remove_file_if_exists(&artifact)?;
        if let Some(parent) = artifact.parent() {
            ensure_dir(parent)?;
        }

        let cmd = compile_command(program, &artifact, opts.variant, sources, args);
        tracing::info!(
            "Compiling {} sources for {} -> {}",
            sources.len(),
            target,
            artifact.display()
        );

        let output = self.runner.run(&cmd).map_err(|e| PipelineError::Compilation {
            artifact: artifact.clone(),
            output: format!("{:#}", e),
        })?;

        // Only stdout carries the outcome; stderr may hold warnings
        if !output.success || !compilation_succeeded(&output.stdout) {
            return Err(PipelineError::Compilation {
                artifact,
                output: output.combined(),
            }
            .into());
        }

        Ok(CompiledArtifact {
            target,
            path: artifact,
        })
    }
}

struct CompileArgs<'a> {
    pinned_version: Option<&'a str>,
    disable_optimizations: bool,
}

fn compile_command(
    program: &Path,
    artifact: &Path,
    variant: GeneratorVariant,
    sources: &GeneratedFileSet,
    args: &CompileArgs<'_>,
) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(program)
        .arg(OUTPUT_FLAG)
        .arg(artifact)
        .arg(VARIANT_FLAG)
        .arg(variant.generator_arg());

    if let Some(version) = args.pinned_version {
        cmd = cmd.arg(DEPENDENCY_VERSION_FLAG).arg(version);
    }
    if args.disable_optimizations {
        cmd = cmd.arg(DISABLE_OPTIMIZATIONS_FLAG);
    }

    cmd.arg(SOURCES_FLAG).args(sources.files())
}

/// Whether compiler stdout reports success.
///
/// Only the final whitespace-delimited token counts, and it must end
/// with [`SUCCESS_MARKER`] (case-sensitive).
pub fn compilation_succeeded(output: &str) -> bool {
    output
        .split_whitespace()
        .last()
        .map(|token| token.ends_with(SUCCESS_MARKER))
        .unwrap_or(false)
}

/// Locate the secondary toolchain executable.
///
/// A directory gets [`SECONDARY_EXECUTABLE`] appended; with no path the
/// executable is looked up on PATH.
pub fn resolve_toolchain(path: Option<&Path>) -> Result<PathBuf, PipelineError> {
    let candidate = match path {
        Some(p) if p.is_dir() => p.join(SECONDARY_EXECUTABLE),
        Some(p) => p.to_path_buf(),
        None => which::which(SECONDARY_EXECUTABLE).map_err(|_| {
            PipelineError::not_found(MissingKind::Toolchain, SECONDARY_EXECUTABLE)
        })?,
    };

    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(PipelineError::not_found(MissingKind::Toolchain, candidate))
    }
}
