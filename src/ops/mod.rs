//! High-level operations behind the CLI commands.

pub mod generate;
pub mod load;
pub mod verify;

pub use generate::{generate, Collaborators, GenerateOptions, GenerationOutcome};
pub use load::{load_description, resolve_output_dir, LoadedDescription};
pub use verify::{format_report, verify, OutputFormat, VerifyReport};
