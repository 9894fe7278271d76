//! The description-parsing collaborator seam.
//!
//! The pipeline does not interpret operations or schemas itself. A
//! [`DescriptionParser`] derives module metadata from the document, consumes
//! `paths` and `definitions` one entry at a time into explicit accumulators,
//! and finally names the commands the package exports.

pub mod basic;

use std::collections::HashSet;

use anyhow::Result;
use semver::Version;
use serde_json::Value;

use crate::core::document::{SwaggerDocument, SwaggerInfo};

pub use basic::BasicDescriptionParser;

/// Request values that seed metadata derivation. They always win over
/// values found in the document.
#[derive(Debug, Clone, Copy)]
pub struct MetadataSeed<'a> {
    pub name: &'a str,
    pub version: &'a Version,
    pub prefix: Option<&'a str>,
}

/// Generation metadata for one path operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFunction {
    pub operation_id: String,
    pub route: String,
    pub method: String,
    pub command_name: String,
}

/// Operation id -> generation metadata, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFunctionDetails {
    functions: Vec<PathFunction>,
}

impl PathFunctionDetails {
    /// Insert, replacing any entry with the same operation id in place.
    pub fn insert(&mut self, function: PathFunction) {
        match self
            .functions
            .iter_mut()
            .find(|f| f.operation_id == function.operation_id)
        {
            Some(existing) => *existing = function,
            None => self.functions.push(function),
        }
    }

    pub fn get(&self, operation_id: &str) -> Option<&PathFunction> {
        self.functions.iter().find(|f| f.operation_id == operation_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathFunction> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Generation metadata for one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFunction {
    pub type_name: String,
    pub command_name: String,
}

/// Type name -> generation metadata, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionFunctionDetails {
    functions: Vec<DefinitionFunction>,
}

impl DefinitionFunctionDetails {
    /// Insert, replacing any entry with the same type name in place.
    pub fn insert(&mut self, function: DefinitionFunction) {
        match self
            .functions
            .iter_mut()
            .find(|f| f.type_name == function.type_name)
        {
            Some(existing) => *existing = function,
            None => self.functions.push(function),
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&DefinitionFunction> {
        self.functions.iter().find(|f| f.type_name == type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinitionFunction> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Interprets the description below its top-level structure.
pub trait DescriptionParser {
    /// Derive module metadata (namespace, description, URIs, ...).
    fn module_metadata(&self, doc: &SwaggerDocument, seed: &MetadataSeed<'_>)
        -> Result<SwaggerInfo>;

    /// Consume one `paths` entry.
    fn add_path(
        &self,
        route: &str,
        item: &Value,
        info: &SwaggerInfo,
        acc: &mut PathFunctionDetails,
    ) -> Result<()>;

    /// Consume one `definitions` entry.
    fn add_definition(
        &self,
        name: &str,
        schema: &Value,
        info: &SwaggerInfo,
        acc: &mut DefinitionFunctionDetails,
    ) -> Result<()>;

    /// Names of the commands the package exports.
    ///
    /// Path commands first, then definition commands; duplicates dropped,
    /// first occurrence kept.
    fn exported_commands(
        &self,
        paths: &PathFunctionDetails,
        definitions: &DefinitionFunctionDetails,
    ) -> Vec<String> {
        dedup_preserving_order(
            paths
                .iter()
                .map(|f| f.command_name.clone())
                .chain(definitions.iter().map(|f| f.command_name.clone())),
        )
    }
}

/// Feed every path and definition through `parser`.
pub fn collect_function_details(
    parser: &dyn DescriptionParser,
    doc: &SwaggerDocument,
    info: &SwaggerInfo,
) -> Result<(PathFunctionDetails, DefinitionFunctionDetails)> {
    let mut paths = PathFunctionDetails::default();
    for (route, item) in &doc.paths {
        parser.add_path(route, item, info, &mut paths)?;
    }

    let mut definitions = DefinitionFunctionDetails::default();
    for (name, schema) in &doc.definitions {
        parser.add_definition(name, schema, info, &mut definitions)?;
    }

    tracing::debug!(
        "collected {} path functions and {} definition functions",
        paths.len(),
        definitions.len()
    );
    Ok((paths, definitions))
}

/// Drop repeated items, keeping the first occurrence.
pub fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
