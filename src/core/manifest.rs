//! The package manifest consumed by the host's module loader.
//!
//! Rendered in the host's data-file syntax (`<Name>.psd1`).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use semver::Version;
use serde::Serialize;

use crate::util::hash::Fingerprint;

/// Final package descriptor. Written exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: Version,
    pub guid: String,
    pub description: String,
    pub author: String,
    pub copyright: String,

    /// Peer packages that must be installed alongside
    pub required_packages: Vec<String>,

    /// Entry point file name, relative to the package root
    pub root_module: String,

    pub exported_commands: Vec<String>,

    /// Format definition files, relative to the package root
    pub format_files: Vec<String>,

    /// Only present when the request asked for a command prefix
    pub prefix: Option<String>,

    /// Only present on hosts that support it
    pub project_uri: Option<String>,

    /// Only present on hosts that support it
    pub license_uri: Option<String>,
}

impl PackageManifest {
    /// File name of the manifest for a package.
    pub fn file_name(name: &str) -> String {
        format!("{}.psd1", name)
    }

    /// Stable package identity derived from the name.
    pub fn guid_for(name: &str) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str("swagpack-package").update_str(&name.to_lowercase());
        let hex = fp.finish();
        format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }

    /// Render the manifest text.
    pub fn render(&self) -> String {
        let mut out = String::from("@{\n");
        field(&mut out, 1, "RootModule", &quote(&self.root_module));
        field(&mut out, 1, "ModuleVersion", &quote(&self.version.to_string()));
        field(&mut out, 1, "GUID", &quote(&self.guid));
        field(&mut out, 1, "Author", &quote(&self.author));
        field(&mut out, 1, "Copyright", &quote(&self.copyright));
        field(&mut out, 1, "Description", &quote(&self.description));
        field(&mut out, 1, "RequiredModules", &array(&self.required_packages));
        field(&mut out, 1, "FunctionsToExport", &array(&self.exported_commands));
        field(&mut out, 1, "FormatsToProcess", &array(&self.format_files));

        if let Some(ref prefix) = self.prefix {
            field(&mut out, 1, "DefaultCommandPrefix", &quote(prefix));
        }

        if self.project_uri.is_some() || self.license_uri.is_some() {
            out.push_str("    PrivateData = @{\n        PSData = @{\n");
            if let Some(ref uri) = self.project_uri {
                field(&mut out, 3, "ProjectUri", &quote(uri));
            }
            if let Some(ref uri) = self.license_uri {
                field(&mut out, 3, "LicenseUri", &quote(uri));
            }
            out.push_str("        }\n    }\n");
        }

        out.push_str("}\n");
        out
    }

    /// Write `<Name>.psd1` into `dir`, returning its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(Self::file_name(&self.name));
        crate::util::fs::write_string(&path, &self.render())?;
        Ok(path)
    }
}

fn field(out: &mut String, depth: usize, key: &str, value: &str) {
    let _ = writeln!(out, "{}{} = {}", "    ".repeat(depth), key, value);
}

/// Single-quoted literal; embedded quotes are doubled.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("@({})", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> PackageManifest {
        PackageManifest {
            name: "Petstore".into(),
            version: Version::new(1, 0, 0),
            guid: PackageManifest::guid_for("Petstore"),
            description: "Pet store client".into(),
            author: "O'Brien".into(),
            copyright: "(c) O'Brien. All rights reserved.".into(),
            required_packages: vec!["PSSwaggerUtility".into()],
            root_module: "Petstore.psm1".into(),
            exported_commands: vec!["Get-Pet".into(), "New-PetObject".into()],
            format_files: vec![],
            prefix: None,
            project_uri: None,
            license_uri: None,
        }
    }

    #[test]
    fn test_render_required_fields() {
        let text = manifest().render();
        assert!(text.starts_with("@{\n"));
        assert!(text.contains("RootModule = 'Petstore.psm1'"));
        assert!(text.contains("ModuleVersion = '1.0.0'"));
        assert!(text.contains("FunctionsToExport = @('Get-Pet', 'New-PetObject')"));
        assert!(text.contains("FormatsToProcess = @()"));
        assert!(text.contains("Author = 'O''Brien'"));
        assert!(!text.contains("DefaultCommandPrefix"));
        assert!(!text.contains("PrivateData"));
    }

    #[test]
    fn test_render_optional_fields() {
        let mut m = manifest();
        m.prefix = Some("Pet".into());
        m.project_uri = Some("https://example.com/project".into());
        let text = m.render();
        assert!(text.contains("DefaultCommandPrefix = 'Pet'"));
        assert!(text.contains("ProjectUri = 'https://example.com/project'"));
        assert!(!text.contains("LicenseUri"));
    }

    #[test]
    fn test_guid_is_stable() {
        let a = PackageManifest::guid_for("Petstore");
        assert_eq!(a, PackageManifest::guid_for("petstore"));
        assert_ne!(a, PackageManifest::guid_for("Other"));
        assert_eq!(a.len(), 36);
        assert_eq!(a.matches('-').count(), 4);
    }
}
