//! Swagpack - turns a Swagger description into an installable module package
//!
//! This crate provides the library side of the `swagpack` CLI: spec
//! acquisition, external code generation, dual-runtime compilation,
//! integrity cataloging and package assembly.

pub mod builder;
pub mod core;
pub mod describe;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for Swagpack unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for process execution
/// and HTTP fetching, plus spec fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::PipelineError, manifest::PackageManifest, request::GenerationRequest,
};

pub use ops::GenerationOutcome;
pub use util::context::GlobalContext;
