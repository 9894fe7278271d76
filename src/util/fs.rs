//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::WalkDir;

use crate::core::errors::PipelineError;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), PipelineError> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| PipelineError::io(path, e))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| PipelineError::io(path, e))
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), PipelineError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| PipelineError::io(path, e))?;
    }
    Ok(())
}

/// Remove a file if it exists.
pub fn remove_file_if_exists(path: &Path) -> Result<(), PipelineError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| PipelineError::io(path, e))?;
    }
    Ok(())
}

/// Recursively collect files under `root` whose extension matches `ext`.
///
/// Results are sorted so callers see a stable order.
pub fn files_with_extension(root: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!("skipping unreadable entry under {}: {}", root.display(), err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Check a file name against a set of glob patterns.
pub fn matches_any(file_name: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|p| p.matches(file_name))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_files_with_extension() {
        let tmp = TempDir::new().unwrap();
        let models = tmp.path().join("Models");
        fs::create_dir_all(&models).unwrap();
        fs::write(tmp.path().join("Client.cs"), "class Client {}").unwrap();
        fs::write(models.join("Pet.CS"), "class Pet {}").unwrap();
        fs::write(tmp.path().join("readme.txt"), "readme").unwrap();

        let files = files_with_extension(tmp.path(), "cs");
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_matches_any() {
        let patterns = vec![Pattern::new("*.csproj").unwrap(), Pattern::new("Program.cs").unwrap()];
        assert!(matches_any("Api.csproj", &patterns));
        assert!(matches_any("Program.cs", &patterns));
        assert!(!matches_any("Pet.cs", &patterns));
    }

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("file.txt");
        write_string(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_remove_file_if_exists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone.dll");
        remove_file_if_exists(&path).unwrap();
        fs::write(&path, "x").unwrap();
        remove_file_if_exists(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let tmp = TempDir::new().unwrap();
        // A directory where the file should go
        let path = tmp.path().join("taken");
        fs::create_dir_all(&path).unwrap();

        let err = write_string(&path, "content").unwrap_err();
        match err {
            PipelineError::Io { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected i/o error, got {other:?}"),
        }
    }
}
