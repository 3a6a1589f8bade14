//! Utility functions for file operations and path manipulation

use crate::error::{Error, Result};
use crate::types::Identifier;
use std::path::{Path, PathBuf};

/// Destination path for an identifier: `<dir>/<identifier>.<extension>`
///
/// Pure function of its inputs; distinct identifiers map to distinct paths.
///
/// # Examples
///
/// ```
/// use patent_dl::types::Identifier;
/// use patent_dl::utils::destination_path;
/// use std::path::Path;
///
/// let id = Identifier::parse("US1234567").unwrap();
/// let path = destination_path(Path::new("results"), &id, "pdf");
/// assert_eq!(path, Path::new("results/US1234567.pdf"));
/// ```
#[must_use]
pub fn destination_path(dir: &Path, identifier: &Identifier, extension: &str) -> PathBuf {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        dir.join(identifier.as_str())
    } else {
        dir.join(format!("{}.{}", identifier, extension))
    }
}

/// Create a directory (and parents) if it does not exist yet
///
/// # Errors
///
/// Returns [`Error::Io`] with the directory name in the message.
pub async fn ensure_directory(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create directory '{}': {}", dir.display(), e),
        ))
    })
}

/// Whether a requested file name is a single plain path component
///
/// Used before serving files out of the results directory.
#[must_use]
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Locate an input file, falling back to a base directory for relative paths
///
/// Returns the path as given when it exists, otherwise `base/path` when that
/// exists and `path` is relative.
///
/// # Errors
///
/// Returns [`Error::Config`] keyed by `key` when neither location exists.
pub fn locate_input(path: &Path, base: &Path, key: &str) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_relative() {
        let candidate = base.join(path);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::config(
        format!(
            "input file '{}' not found (also looked in '{}')",
            path.display(),
            base.display()
        ),
        key,
    ))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn destination_path_appends_extension() {
        let dir = Path::new("/data/results");
        assert_eq!(
            destination_path(dir, &id("US1234567"), "pdf"),
            PathBuf::from("/data/results/US1234567.pdf")
        );
    }

    #[test]
    fn destination_path_tolerates_leading_dot_and_empty_extension() {
        let dir = Path::new("out");
        assert_eq!(
            destination_path(dir, &id("EP1"), ".pdf"),
            PathBuf::from("out/EP1.pdf")
        );
        assert_eq!(destination_path(dir, &id("EP1"), ""), PathBuf::from("out/EP1"));
    }

    #[test]
    fn destination_path_is_distinct_per_identifier() {
        let dir = Path::new("out");
        assert_ne!(
            destination_path(dir, &id("US1"), "pdf"),
            destination_path(dir, &id("US10"), "pdf")
        );
    }

    #[tokio::test]
    async fn ensure_directory_creates_nested_dirs_and_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_directory(&nested).await.unwrap();
        assert!(nested.is_dir());
        ensure_directory(&nested).await.unwrap();
    }

    #[tokio::test]
    async fn ensure_directory_fails_when_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();
        let err = ensure_directory(&file.join("sub")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
    }

    #[test]
    fn plain_file_names() {
        assert!(is_plain_file_name("US1234567.pdf"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../secret"));
        assert!(!is_plain_file_name("a\\b"));
    }

    #[test]
    fn locate_input_prefers_path_as_given() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("artifact.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(
            locate_input(&file, Path::new("/nonexistent"), "artifact").unwrap(),
            file
        );
    }

    #[test]
    fn locate_input_falls_back_to_base_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("office_action_result.txt"), "x").unwrap();
        let found = locate_input(
            Path::new("office_action_result.txt"),
            temp.path(),
            "artifact",
        )
        .unwrap();
        assert_eq!(found, temp.path().join("office_action_result.txt"));
    }

    #[test]
    fn locate_input_missing_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = locate_input(Path::new("missing.txt"), temp.path(), "artifact").unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("artifact")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
