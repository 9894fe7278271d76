//! Package Assembler.
//!
//! Lays out the final package: shared support files, the integrity
//! catalog, the root entry point, the manifest and the localized
//! resources. Writes are not transactional; a failure part-way leaves
//! the directory as-is for inspection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::dependency::DependencyPin;
use crate::builder::generator::GeneratedFileSet;
use crate::builder::templates::{render_entry_point, EntryPointValues};
use crate::core::catalog::{catalog_key, IntegrityCatalog, CATALOG_FILE};
use crate::core::document::SwaggerInfo;
use crate::core::errors::{MissingKind, PipelineError};
use crate::core::manifest::PackageManifest;
use crate::core::platform::HostPlatform;
use crate::describe::{DefinitionFunctionDetails, DescriptionParser, PathFunctionDetails};
use crate::util::fs::files_with_extension;

/// Runtime helper script copied from the support directory.
pub const HELPER_SCRIPT_FILE: &str = "GeneratedHelpers.ps1";

/// String resources for [`HELPER_SCRIPT_FILE`].
pub const HELPER_RESOURCES_FILE: &str = "GeneratedHelpers.Resources.psd1";

/// Localized resources template, copied as `<Name>.Resources.psd1`.
pub const RESOURCES_TEMPLATE_FILE: &str = "Generated.Resources.psd1";

/// Where format definitions are emitted, relative to the package root.
pub const FORMAT_FILES_DIR: &str = "Generated.PowerShell.Commands/FormatFiles";

pub const FORMAT_FILE_EXTENSION: &str = "ps1xml";

/// Everything the assembler consumes.
pub struct AssemblyInputs<'a> {
    /// Resolved package root
    pub output_dir: &'a Path,
    /// Generator install location holding the shared files
    pub support_dir: &'a Path,
    pub info: &'a SwaggerInfo,
    pub generated: &'a GeneratedFileSet,
    pub parser: &'a dyn DescriptionParser,
    pub paths: &'a PathFunctionDetails,
    pub definitions: &'a DefinitionFunctionDetails,
    /// Present only when compilation ran
    pub pin: Option<&'a DependencyPin>,
    pub dependency_name: &'a str,
    pub required_packages: Vec<String>,
    pub platform: &'a HostPlatform,
}

/// What the assembler wrote.
#[derive(Debug, Clone)]
pub struct AssembledPackage {
    pub catalog_path: PathBuf,
    /// SHA-512 of the catalog file itself
    pub catalog_hash: String,
    pub catalog_entries: usize,
    pub entry_point: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: PackageManifest,
}

/// Assemble the package in `inputs.output_dir`.
pub fn assemble(inputs: &AssemblyInputs<'_>) -> Result<AssembledPackage> {
    let out = inputs.output_dir;
    let name = inputs.info.name.as_str();

    for file in [HELPER_SCRIPT_FILE, HELPER_RESOURCES_FILE] {
        copy_support_file(inputs.support_dir, file, &out.join(file))?;
    }

    let catalog = IntegrityCatalog::build(inputs.generated.root(), inputs.generated.files())?;
    let catalog_path = out.join(CATALOG_FILE);
    let catalog_hash = catalog.write(&catalog_path)?;
    tracing::info!(
        "Wrote integrity catalog with {} entries ({}...)",
        catalog.len(),
        &catalog_hash[..16]
    );

    let exported_commands = inputs
        .parser
        .exported_commands(inputs.paths, inputs.definitions);

    let entry_point_name = format!("{}.psm1", name);
    let entry_point = out.join(&entry_point_name);
    let entry_text = render_entry_point(&EntryPointValues {
        module_name: name,
        namespace: &inputs.info.namespace,
        dependency_name: inputs.pin.map(|p| p.name.as_str()).unwrap_or(inputs.dependency_name),
        dependency_version: inputs.pin.map(|p| p.version.as_str()).unwrap_or(""),
    });
    fs::write(&entry_point, entry_text).map_err(|e| PipelineError::io(&entry_point, e))?;

    let format_files = discover_format_files(out);

    let supports_uris = inputs.platform.supports_package_uris();
    let manifest = PackageManifest {
        name: name.to_string(),
        version: inputs.info.version.clone(),
        guid: PackageManifest::guid_for(name),
        description: inputs.info.description.clone(),
        author: inputs.info.author.clone(),
        copyright: inputs.info.copyright.clone(),
        required_packages: inputs.required_packages.clone(),
        root_module: entry_point_name,
        exported_commands,
        format_files,
        prefix: inputs.info.prefix.clone(),
        project_uri: inputs.info.project_uri.clone().filter(|_| supports_uris),
        license_uri: inputs.info.license_uri.clone().filter(|_| supports_uris),
    };
    let manifest_path = manifest.write(out)?;

    copy_support_file(
        inputs.support_dir,
        RESOURCES_TEMPLATE_FILE,
        &out.join(format!("{}.Resources.psd1", name)),
    )?;

    Ok(AssembledPackage {
        catalog_path,
        catalog_hash,
        catalog_entries: catalog.len(),
        entry_point,
        manifest_path,
        manifest,
    })
}

fn copy_support_file(support_dir: &Path, file: &str, dst: &Path) -> Result<(), PipelineError> {
    let src = support_dir.join(file);
    if !src.is_file() {
        return Err(PipelineError::not_found(MissingKind::SupportFile, src));
    }
    fs::copy(&src, dst).map_err(|e| PipelineError::io(dst, e))?;
    Ok(())
}

/// Format definition files under the package, as `/`-separated paths
/// relative to the package root.
pub fn discover_format_files(package_root: &Path) -> Vec<String> {
    let dir = package_root.join(FORMAT_FILES_DIR);
    if !dir.is_dir() {
        return Vec::new();
    }
    files_with_extension(&dir, FORMAT_FILE_EXTENSION)
        .iter()
        .map(|f| catalog_key(package_root, f))
        .collect()
}
