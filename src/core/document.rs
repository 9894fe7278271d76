//! In-memory form of the interface description.
//!
//! Only the top-level structure is understood here: `info`, `paths` and
//! `definitions`. Everything below those keys is left as raw JSON for the
//! description-parsing collaborator.

use std::path::Path;

use anyhow::{bail, Context, Result};
use semver::Version;
use serde::Serialize;
use serde_json::{Map, Value};

/// Parsed top-level structure of a Swagger document.
#[derive(Debug, Clone, Default)]
pub struct SwaggerDocument {
    /// The `info` object
    pub info: Map<String, Value>,

    /// Route -> path item
    pub paths: Map<String, Value>,

    /// Type name -> schema
    pub definitions: Map<String, Value>,
}

impl SwaggerDocument {
    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("spec is not valid JSON")?;

        let Value::Object(mut root) = value else {
            bail!("spec document must be a JSON object");
        };

        Ok(SwaggerDocument {
            info: take_object(&mut root, "info")?,
            paths: take_object(&mut root, "paths")?,
            definitions: take_object(&mut root, "definitions")?,
        })
    }

    /// Read and parse a spec file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = crate::util::fs::read_to_string(path)?;
        Self::parse(&text).with_context(|| format!("failed to parse spec: {}", path.display()))
    }

    /// Look up a string under `info`, following a dotted key path.
    pub fn info_str(&self, key_path: &str) -> Option<&str> {
        let mut parts = key_path.split('.');
        let mut current = self.info.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        current.as_str()
    }
}

fn take_object(root: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => bail!("`{}` must be an object, found {}", key, json_kind(&other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Module metadata derived from the document and the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwaggerInfo {
    pub name: String,
    pub version: Version,
    pub namespace: String,
    pub prefix: Option<String>,
    pub description: String,
    pub author: String,
    pub copyright: String,
    pub license_name: Option<String>,
    pub license_uri: Option<String>,
    pub project_uri: Option<String>,
}

impl SwaggerInfo {
    /// The conventional namespace for a module name and version,
    /// e.g. `Microsoft.PowerShell.Petstore.v100`.
    pub fn default_namespace(name: &str, version: &Version) -> String {
        let digits: String = version
            .to_string()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        format!("Microsoft.PowerShell.{}.v{}", name, digits)
    }
}
