//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it and any missing parents.
///
/// Succeeds if the directory is already there.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("build/gcc/cxx17/debug");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_on_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("build");
        fs::write(&file, "not a directory").unwrap();

        assert!(ensure_dir(&file.join("gcc")).is_err());
    }

    #[test]
    fn test_normalize_missing_path() {
        let p = Path::new("/definitely/not/here");
        assert_eq!(normalize_path(p), p);
    }
}
