//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

/// Swagpack - generate installable module packages from Swagger specs
#[derive(Parser)]
#[command(name = "swagpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a package from a Swagger spec
    Generate(GenerateArgs),

    /// Check a generated package against its integrity catalog
    Verify(VerifyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("spec").required(true).args(["spec_path", "spec_uri"])))]
pub struct GenerateArgs {
    /// Local spec file
    #[arg(long)]
    pub spec_path: Option<PathBuf>,

    /// Remote spec URI
    #[arg(long)]
    pub spec_uri: Option<String>,

    /// Existing directory to write the package into
    #[arg(short, long)]
    pub output: PathBuf,

    /// Package name
    #[arg(short, long)]
    pub name: String,

    /// Package version
    #[arg(long, default_value = "0.0.1")]
    pub version: String,

    /// Default command prefix recorded in the manifest
    #[arg(long)]
    pub prefix: Option<String>,

    /// Use the cloud-specific generator variant
    #[arg(long)]
    pub cloud: bool,

    /// Do not compile the generated sources
    #[arg(long)]
    pub skip_compilation: bool,

    /// Also compile for the secondary runtime
    #[arg(long)]
    pub compile_secondary: bool,

    /// Secondary runtime toolchain (executable or its directory)
    #[arg(long)]
    pub secondary_toolchain: Option<PathBuf>,

    /// Compile without optimizations
    #[arg(long)]
    pub disable_optimizations: bool,

    /// Client runtime version to pin (overrides config)
    #[arg(long)]
    pub pinned_version: Option<String>,

    /// Code generator executable (overrides config)
    #[arg(long, env = "SWAGPACK_GENERATOR")]
    pub generator: Option<PathBuf>,

    /// Compiler driver executable (overrides config)
    #[arg(long, env = "SWAGPACK_COMPILER")]
    pub compiler: Option<PathBuf>,

    /// Host platform version to target, e.g. 5.1 (overrides config)
    #[arg(long)]
    pub platform_version: Option<String>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Package directory containing the integrity catalog
    pub package: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
