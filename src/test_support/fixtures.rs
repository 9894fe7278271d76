//! Test fixtures for common pipeline scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::assembler::{
    HELPER_RESOURCES_FILE, HELPER_SCRIPT_FILE, RESOURCES_TEMPLATE_FILE,
};
use crate::builder::generator::OUTPUT_DIRECTORY_FLAG;
use crate::util::process::ProcessBuilder;

/// A spec with one path operation and one definition.
pub const MINIMAL_SPEC: &str = r#"{
  "swagger": "2.0",
  "info": {
    "title": "Petstore",
    "description": "A minimal pet store",
    "version": "1.0.0",
    "contact": { "name": "Pet Ops" },
    "license": { "name": "MIT", "url": "https://example.com/license" }
  },
  "paths": {
    "/pets/{petId}": {
      "get": {
        "operationId": "Pets_Get",
        "parameters": [
          { "name": "petId", "in": "path", "required": true, "type": "string" }
        ]
      }
    }
  },
  "definitions": {
    "Pet": {
      "type": "object",
      "properties": {
        "id": { "type": "string" },
        "name": { "type": "string" }
      }
    }
  }
}"#;

/// Files a generator run emits, relative to its output directory.
///
/// Only `Client.cs` and `Models/Pet.cs` are application sources; the rest
/// are scaffolding or cloud-client support code.
pub const EMITTED_FILES: &[(&str, &str)] = &[
    ("Client.cs", "public class PetstoreClient {}"),
    ("Models/Pet.cs", "public class Pet { public string Id; }"),
    ("Program.cs", "static class Program { static void Main() {} }"),
    ("Properties/AssemblyInfo.cs", "[assembly: AssemblyVersion(\"1.0.0\")]"),
    ("Petstore.csproj", "<Project />"),
    ("Generated.Azure.General/AzureClient.cs", "public class AzureClient {}"),
];

/// Write the spec fixture into `dir` and return its path.
pub fn write_spec(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("spec.json");
    fs::write(&path, contents).expect("failed to write spec fixture");
    path
}

/// Populate a generator support directory with the shared files.
pub fn write_support_dir(dir: &Path) {
    fs::create_dir_all(dir).expect("failed to create support dir");
    fs::write(dir.join(HELPER_SCRIPT_FILE), "function Get-HelperVersion { '1.0' }\n")
        .expect("failed to write helper script");
    fs::write(dir.join(HELPER_RESOURCES_FILE), "ConvertFrom-StringData @'\n'@\n")
        .expect("failed to write helper resources");
    fs::write(
        dir.join(RESOURCES_TEMPLATE_FILE),
        "ConvertFrom-StringData @'\nGeneratedBy = swagpack\n'@\n",
    )
    .expect("failed to write resources template");
}

/// Write [`EMITTED_FILES`] under `root`.
pub fn write_emitted_files(root: &Path) {
    for (rel, contents) in EMITTED_FILES {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create emitted dir");
        }
        fs::write(&path, contents).expect("failed to write emitted file");
    }
}

/// Side effect for a mocked generator: emit files into its output dir.
pub fn emit_into_output_dir(cmd: &ProcessBuilder) {
    if let Some(dir) = cmd.arg_value(OUTPUT_DIRECTORY_FLAG) {
        write_emitted_files(Path::new(dir));
    }
}
