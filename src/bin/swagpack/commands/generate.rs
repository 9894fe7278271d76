//! `swagpack generate` command

use anyhow::{anyhow, Context, Result};
use semver::Version;
use url::Url;

use crate::cli::GenerateArgs;
use swagpack::core::platform::HostPlatform;
use swagpack::core::request::{GenerationRequest, GeneratorVariant, SpecSource};
use swagpack::describe::BasicDescriptionParser;
use swagpack::ops::generate::{generate, Collaborators, GenerateOptions};
use swagpack::sources::HttpFetcher;
use swagpack::util::shell::{Shell, Status};
use swagpack::util::{GlobalContext, SystemRunner};

pub fn execute(args: GenerateArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;

    // Load configuration (global + project); CLI flags win
    let mut config = ctx.load_config();
    if let Some(generator) = args.generator {
        config.generator.program = Some(generator);
    }
    if let Some(compiler) = args.compiler {
        config.compiler.program = Some(compiler);
    }

    let platform = match args.platform_version.as_deref() {
        Some(v) => v.parse::<HostPlatform>().map_err(|e| anyhow!("{}", e))?,
        None => config.host_platform(),
    };
    if !platform.uses_versioned_dirs() {
        shell.warn(format!(
            "host platform {} predates versioned module directories; writing into {} as-is",
            platform,
            args.output.display()
        ));
    }

    let version = Version::parse(&args.version)
        .with_context(|| format!("invalid package version: {}", args.version))?;

    let source = match (args.spec_path, args.spec_uri) {
        (Some(path), _) => SpecSource::Path(ctx.resolve(&path)),
        (None, Some(uri)) => {
            SpecSource::Uri(Url::parse(&uri).with_context(|| format!("invalid spec URI: {}", uri))?)
        }
        (None, None) => return Err(anyhow!("one of --spec-path or --spec-uri is required")),
    };

    let variant = if args.cloud {
        GeneratorVariant::Cloud
    } else {
        GeneratorVariant::Standard
    };

    let mut request = GenerationRequest::new(source, ctx.resolve(&args.output), &args.name, version)
        .with_variant(variant)
        .skip_compilation(args.skip_compilation)
        .disable_optimizations(args.disable_optimizations);
    if let Some(prefix) = args.prefix {
        request = request.with_prefix(prefix);
    }
    if args.compile_secondary || args.secondary_toolchain.is_some() {
        request = request.compile_secondary(args.secondary_toolchain.map(|p| ctx.resolve(&p)));
    }

    let opts = GenerateOptions {
        pinned_version: args.pinned_version,
        platform: Some(platform),
    };

    let runner = SystemRunner;
    let fetcher = HttpFetcher;
    let collaborators = Collaborators {
        runner: &runner,
        fetcher: &fetcher,
        parser: &BasicDescriptionParser,
    };

    let spinner = shell.spinner(
        Status::Generating,
        format!("{} v{}", request.name, request.version),
    );
    let result = generate(&request, &config, collaborators, &opts);
    spinner.finish();
    let outcome = result?;

    for artifact in &outcome.artifacts {
        shell.note(format!("{} -> {}", artifact.target, artifact.path.display()));
    }
    shell.note(format!(
        "catalog {} (sha512 {})",
        outcome.catalog_path.display(),
        outcome.catalog_hash
    ));
    shell.status(
        Status::Finished,
        format!(
            "`{}` with {} commands -> {}",
            args.name,
            outcome.exported_commands.len(),
            outcome.output_dir.display()
        ),
    );

    Ok(())
}
