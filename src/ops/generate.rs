//! Implementation of `swagpack generate`.
//!
//! Drives the whole pipeline for one request: validate, acquire the spec,
//! load it, collect command metadata, run the generator, compile, and
//! assemble the package. Any stage failure aborts the run.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::assembler::{assemble, AssemblyInputs};
use crate::builder::compiler::{CompileOptions, DualRuntimeCompiler};
use crate::builder::dependency::DependencyPin;
use crate::builder::generator::{CodeGenerator, GENERATED_ROOT_DIR};
use crate::core::platform::HostPlatform;
use crate::core::request::GenerationRequest;
use crate::core::runtime::CompiledArtifact;
use crate::describe::{collect_function_details, DescriptionParser};
use crate::ops::load::load_description;
use crate::sources::{acquire_spec, builtin_rewrite_rules, Fetcher};
use crate::util::config::Config;
use crate::util::process::ProcessRunner;

/// External collaborators the pipeline talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub fetcher: &'a dyn Fetcher,
    pub parser: &'a dyn DescriptionParser,
}

/// Per-invocation overrides of configured values.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Pinned client-runtime version (--pinned-version)
    pub pinned_version: Option<String>,

    /// Host platform to target (--platform-version)
    pub platform: Option<HostPlatform>,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub output_dir: PathBuf,
    pub catalog_path: PathBuf,
    /// SHA-512 of the catalog file
    pub catalog_hash: String,
    pub manifest_path: PathBuf,
    /// Empty when compilation was skipped
    pub artifacts: Vec<CompiledArtifact>,
    pub exported_commands: Vec<String>,
}

/// Run the pipeline for `request`.
pub fn generate(
    request: &GenerationRequest,
    config: &Config,
    collaborators: Collaborators<'_>,
    opts: &GenerateOptions,
) -> Result<GenerationOutcome> {
    // Before any I/O
    request.validate()?;

    let platform = opts.platform.clone().unwrap_or_else(|| config.host_platform());

    let mut rules = builtin_rewrite_rules();
    rules.extend(config.sources.rewrite.iter().cloned());
    let spec = acquire_spec(&request.source, &request.output, collaborators.fetcher, &rules)?;

    let loaded = load_description(spec.path(), request, collaborators.parser, &platform)?;
    let (paths, definitions) =
        collect_function_details(collaborators.parser, &loaded.document, &loaded.info)?;

    let generator = CodeGenerator::new(config.generator_program(), collaborators.runner);
    let generated = generator.generate(
        spec.path(),
        request.variant,
        &loaded.output_dir.join(GENERATED_ROOT_DIR),
        &loaded.info.namespace,
    )?;

    let (pin, artifacts) = if request.skip_compilation {
        tracing::info!("Skipping compilation");
        (None, Vec::new())
    } else {
        let pin = DependencyPin::resolve(config, opts.pinned_version.as_deref())?;
        let compiler = DualRuntimeCompiler::new(
            config.compiler_program(),
            config.artifact_extension(),
            collaborators.runner,
        );
        let artifacts = compiler.compile_all(
            &generated,
            &CompileOptions {
                package_root: &loaded.output_dir,
                namespace: &loaded.info.namespace,
                variant: request.variant,
                pin: &pin,
                disable_optimizations: request.disable_optimizations,
                compile_secondary: request.compile_secondary,
                secondary_toolchain: request.secondary_toolchain.as_deref(),
            },
        )?;
        (Some(pin), artifacts)
    };

    let support_dir = config.support_dir();
    let package = assemble(&AssemblyInputs {
        output_dir: &loaded.output_dir,
        support_dir: &support_dir,
        info: &loaded.info,
        generated: &generated,
        parser: collaborators.parser,
        paths: &paths,
        definitions: &definitions,
        pin: pin.as_ref(),
        dependency_name: config.dependency_name(),
        required_packages: config.required_packages(request.variant.is_cloud()),
        platform: &platform,
    })?;

    Ok(GenerationOutcome {
        output_dir: loaded.output_dir,
        catalog_path: package.catalog_path,
        catalog_hash: package.catalog_hash,
        manifest_path: package.manifest_path,
        artifacts,
        exported_commands: package.manifest.exported_commands,
    })
}
