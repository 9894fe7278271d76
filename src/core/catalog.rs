//! Content-addressed catalog of generated source files.
//!
//! The catalog is written once per run as a flat JSON object:
//!
//! ```json
//! {
//!   "Algorithm": "SHA512",
//!   "Models/Pet.cs": "9b71d224bd62f378...",
//!   "PetstoreClient.cs": "3c9909afec25354d..."
//! }
//! ```
//!
//! Keys are relative to the generation root with `/` separators and no
//! leading or trailing separator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::util::fs::relative_path;
use crate::util::hash::{sha512_file, HASH_ALGORITHM};

/// File name of the catalog at the package root.
pub const CATALOG_FILE: &str = "FileHashes.json";

const ALGORITHM_KEY: &str = "Algorithm";

/// Relative path -> hex digest, plus the declared algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityCatalog {
    algorithm: String,
    entries: BTreeMap<String, String>,
}

impl IntegrityCatalog {
    /// An empty catalog using the fixed algorithm.
    pub fn new() -> Self {
        IntegrityCatalog {
            algorithm: HASH_ALGORITHM.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Hash every file and key it by its path relative to `root`.
    pub fn build(root: &Path, files: &[PathBuf]) -> Result<Self> {
        let hashed: Vec<(String, String)> = files
            .par_iter()
            .map(|file| -> Result<(String, String)> {
                Ok((catalog_key(root, file), sha512_file(file)?))
            })
            .collect::<Result<_>>()?;

        let mut catalog = IntegrityCatalog::new();
        for (key, digest) in hashed {
            catalog.entries.insert(key, digest);
        }
        tracing::debug!("cataloged {} files under {}", catalog.len(), root.display());
        Ok(catalog)
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the on-disk JSON object, `Algorithm` first.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(ALGORITHM_KEY.to_string(), Value::String(self.algorithm.clone()));
        for (key, digest) in &self.entries {
            map.insert(key.clone(), Value::String(digest.clone()));
        }
        Value::Object(map)
    }

    /// Write the catalog and return the digest of the written file.
    pub fn write(&self, path: &Path) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.to_json())?;
        crate::util::fs::write_string(path, &json)?;
        sha512_file(path)
    }

    /// Load a catalog previously written by [`IntegrityCatalog::write`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = crate::util::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("integrity catalog is not valid JSON: {}", path.display()))?;

        let Value::Object(map) = value else {
            bail!("integrity catalog must be a JSON object: {}", path.display());
        };

        let mut algorithm = None;
        let mut entries = BTreeMap::new();
        for (key, value) in map {
            let Value::String(s) = value else {
                bail!("integrity catalog value for `{}` is not a string", key);
            };
            if key == ALGORITHM_KEY {
                algorithm = Some(s);
            } else {
                entries.insert(key, s);
            }
        }

        let algorithm = algorithm
            .with_context(|| format!("integrity catalog has no `{}` key", ALGORITHM_KEY))?;
        if !algorithm.eq_ignore_ascii_case(HASH_ALGORITHM) {
            bail!(
                "unsupported integrity catalog algorithm `{}` (expected {})",
                algorithm,
                HASH_ALGORITHM
            );
        }

        Ok(IntegrityCatalog { algorithm, entries })
    }
}

impl Default for IntegrityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog key for `file`: relative to `root`, `/`-separated, trimmed.
pub fn catalog_key(root: &Path, file: &Path) -> String {
    let rel = file
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| relative_path(root, file));

    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().replace('\\', "/"))
        .collect::<Vec<_>>()
        .join("/");

    joined.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_catalog_key_normalizes() {
        let root = Path::new("/gen/root");
        assert_eq!(
            catalog_key(root, &root.join("a").join("b").join("Model.cs")),
            "a/b/Model.cs"
        );
        assert_eq!(catalog_key(root, Path::new("/gen/root/Client.cs")), "Client.cs");
    }

    #[test]
    fn test_build_records_relative_keys() {
        let tmp = TempDir::new().unwrap();
        let file = write(tmp.path(), "a/b/Model.cs", "class Model {}");

        let catalog = IntegrityCatalog::build(tmp.path(), &[file.clone()]).unwrap();
        assert_eq!(catalog.algorithm(), "SHA512");
        assert_eq!(catalog.len(), 1);

        let digest = catalog.get("a/b/Model.cs").unwrap();
        assert_eq!(digest.len(), 128);
        assert_eq!(digest, sha512_file(&file).unwrap());
    }

    #[test]
    fn test_rehash_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let file = write(tmp.path(), "Client.cs", "class Client {}");

        let first = IntegrityCatalog::build(tmp.path(), &[file.clone()]).unwrap();
        let second = IntegrityCatalog::build(tmp.path(), &[file]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_then_load() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "gen/A.cs", "a");
        let b = write(tmp.path(), "gen/sub/B.cs", "b");
        let catalog = IntegrityCatalog::build(&tmp.path().join("gen"), &[a, b]).unwrap();

        let path = tmp.path().join(CATALOG_FILE);
        let own_hash = catalog.write(&path).unwrap();
        assert_eq!(own_hash, sha512_file(&path).unwrap());

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.trim_start().starts_with("{\n  \"Algorithm\": \"SHA512\""));

        let loaded = IntegrityCatalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_load_rejects_unknown_algorithm() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CATALOG_FILE);
        std::fs::write(&path, r#"{"Algorithm": "MD5", "A.cs": "00"}"#).unwrap();
        assert!(IntegrityCatalog::load(&path).is_err());
    }
}
