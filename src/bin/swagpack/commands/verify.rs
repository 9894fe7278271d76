//! `swagpack verify` command

use anyhow::Result;

use crate::cli::VerifyArgs;
use swagpack::ops::verify::{format_report, verify, OutputFormat};
use swagpack::util::shell::{Shell, Status};
use swagpack::util::GlobalContext;

pub fn execute(args: VerifyArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let package = ctx.resolve(&args.package);

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let report = verify(&package)?;
    print!("{}", format_report(&report, format));

    // Exit with error code if verification failed
    if !report.passed {
        if !args.json {
            shell.status(
                Status::Error,
                format!(
                    "{} missing, {} modified, {} untracked",
                    report.missing.len(),
                    report.modified.len(),
                    report.untracked.len()
                ),
            );
        }
        std::process::exit(1);
    }

    if !args.json {
        shell.status(
            Status::Verified,
            format!("{} files in {}", report.checked, package.display()),
        );
    }

    Ok(())
}
