//! Spec sources - resolving a local path or remote URI to a spec file.

pub mod acquire;
pub mod http;

pub use acquire::{acquire_spec, builtin_rewrite_rules, rewrite_uri, AcquiredSpec, RewriteRule};
pub use http::{Fetcher, HttpFetcher};
