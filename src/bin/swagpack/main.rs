//! Swagpack CLI - Swagger to installable module packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("swagpack=debug")
    } else if cli.quiet {
        EnvFilter::new("swagpack=warn")
    } else {
        EnvFilter::new("swagpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = swagpack::util::shell::Shell::from_flags(cli.quiet, cli.verbose, cli.no_color);

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &shell),
        Commands::Verify(args) => commands::verify::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
