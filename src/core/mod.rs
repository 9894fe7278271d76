//! Core data types for the generation pipeline.

pub mod catalog;
pub mod document;
pub mod errors;
pub mod manifest;
pub mod platform;
pub mod request;
pub mod runtime;

pub use catalog::{IntegrityCatalog, CATALOG_FILE};
pub use document::{SwaggerDocument, SwaggerInfo};
pub use errors::{MissingKind, PipelineError};
pub use manifest::PackageManifest;
pub use platform::HostPlatform;
pub use request::{GenerationRequest, GeneratorVariant, SpecSource};
pub use runtime::{CompiledArtifact, RuntimeTarget};
