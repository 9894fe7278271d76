//! Built-in description parser.
//!
//! Covers the common Swagger conventions: `Noun_Verb` operation ids and
//! object definitions with properties.

use anyhow::Result;
use serde_json::Value;

use crate::core::document::{SwaggerDocument, SwaggerInfo};
use crate::describe::{
    DefinitionFunction, DefinitionFunctionDetails, DescriptionParser, MetadataSeed, PathFunction,
    PathFunctionDetails,
};

const HTTP_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

const CODEGEN_SETTINGS: &str = "x-ms-code-generation-settings";

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicDescriptionParser;

impl DescriptionParser for BasicDescriptionParser {
    fn module_metadata(
        &self,
        doc: &SwaggerDocument,
        seed: &MetadataSeed<'_>,
    ) -> Result<SwaggerInfo> {
        let namespace = doc
            .info_str(&format!("{}.namespace", CODEGEN_SETTINGS))
            .map(str::to_string)
            .unwrap_or_else(|| SwaggerInfo::default_namespace(seed.name, seed.version));

        let description = doc
            .info_str("description")
            .or_else(|| doc.info_str("title"))
            .unwrap_or_default()
            .to_string();

        let author = doc
            .info_str("contact.name")
            .map(str::to_string)
            .unwrap_or_else(|| seed.name.to_string());

        let copyright = doc
            .info_str(&format!("{}.copyright", CODEGEN_SETTINGS))
            .map(str::to_string)
            .unwrap_or_else(|| format!("(c) {}. All rights reserved.", author));

        Ok(SwaggerInfo {
            name: seed.name.to_string(),
            version: seed.version.clone(),
            namespace,
            prefix: seed.prefix.map(str::to_string),
            description,
            author,
            copyright,
            license_name: doc.info_str("license.name").map(str::to_string),
            license_uri: doc.info_str("license.url").map(str::to_string),
            project_uri: doc
                .info_str(&format!("{}.projectUri", CODEGEN_SETTINGS))
                .or_else(|| doc.info_str("contact.url"))
                .map(str::to_string),
        })
    }

    fn add_path(
        &self,
        route: &str,
        item: &Value,
        _info: &SwaggerInfo,
        acc: &mut PathFunctionDetails,
    ) -> Result<()> {
        let Some(methods) = item.as_object() else {
            tracing::warn!("path `{}` is not an object; skipped", route);
            return Ok(());
        };

        for (method, operation) in methods {
            if !HTTP_METHODS.contains(&method.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Some(operation_id) = operation.get("operationId").and_then(Value::as_str) else {
                tracing::warn!("{} {} has no operationId; skipped", method, route);
                continue;
            };

            acc.insert(PathFunction {
                operation_id: operation_id.to_string(),
                route: route.to_string(),
                method: method.to_ascii_lowercase(),
                command_name: command_name_for_operation(operation_id),
            });
        }
        Ok(())
    }

    fn add_definition(
        &self,
        name: &str,
        schema: &Value,
        _info: &SwaggerInfo,
        acc: &mut DefinitionFunctionDetails,
    ) -> Result<()> {
        let has_properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|p| !p.is_empty())
            .unwrap_or(false);

        if has_properties {
            acc.insert(DefinitionFunction {
                type_name: name.to_string(),
                command_name: format!("New-{}Object", pascal(name)),
            });
        }
        Ok(())
    }
}

/// `Pets_List` -> `Get-Pets`, `ping` -> `Invoke-Ping`.
pub fn command_name_for_operation(operation_id: &str) -> String {
    match operation_id.split_once('_') {
        Some((noun, verb)) if !noun.is_empty() && !verb.is_empty() => {
            format!("{}-{}", ps_verb(verb), pascal(noun))
        }
        _ => format!("Invoke-{}", pascal(operation_id.trim_matches('_'))),
    }
}

fn ps_verb(verb: &str) -> String {
    match verb.to_ascii_lowercase().as_str() {
        "list" | "get" => "Get".to_string(),
        "create" | "createorupdate" => "New".to_string(),
        "update" => "Set".to_string(),
        "delete" => "Remove".to_string(),
        _ => pascal(verb),
    }
}

fn pascal(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
