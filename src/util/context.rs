//! Global context for cxxbuild operations.
//!
//! Provides centralized access to the working directory, the source root
//! and the configuration files that apply to it.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use miette::Diagnostic;
use thiserror::Error;

use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::fs::normalize_path;

/// File marking a directory as part of a CMake source tree.
pub const CMAKE_LISTS: &str = "CMakeLists.txt";

/// Error locating the source root.
#[derive(Debug, Error, Diagnostic)]
pub enum ContextError {
    #[error("could not find `CMakeLists.txt` in `{}` or any parent directory", .dir.display())]
    #[diagnostic(
        code(cxxbuild::context::no_source_root),
        help("Run cxxbuild inside a CMake project or pass `--source-dir <DIR>`")
    )]
    NoSourceRoot { dir: PathBuf },

    #[error("failed to resolve source directory `{}`", .path.display())]
    #[diagnostic(code(cxxbuild::context::resolve))]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Global context containing paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global configuration file, if a home directory is known
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: global_config_path(),
        }
    }

    /// Override the global configuration file location.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Resolve the absolute, symlink-free source root.
    ///
    /// An explicit directory (relative to cwd) wins. Otherwise search upward
    /// from cwd: the nearest directory with a `.cxxbuild/config.toml`, or
    /// else the top of the contiguous run of directories holding a
    /// `CMakeLists.txt`.
    pub fn source_root(&self, explicit: Option<&Path>) -> Result<PathBuf, ContextError> {
        let root = match explicit {
            Some(dir) => self.cwd.join(dir),
            None => self.find_source_root()?,
        };

        let root = root
            .canonicalize()
            .map_err(|source| ContextError::Resolve { path: root, source })?;
        tracing::debug!("source root: {}", root.display());
        Ok(root)
    }

    fn find_source_root(&self) -> Result<PathBuf, ContextError> {
        let start = normalize_path(&self.cwd);

        // The global config lives at the same relative path under home
        let global = self.global_config.as_deref().map(normalize_path);
        if let Some(dir) = start.ancestors().find(|dir| {
            let marker = project_config_path(dir);
            marker.is_file() && global.as_deref() != Some(marker.as_path())
        }) {
            return Ok(dir.to_path_buf());
        }

        let mut found = None;
        for dir in start.ancestors() {
            if dir.join(CMAKE_LISTS).is_file() {
                found = Some(dir);
            } else if found.is_some() {
                break;
            }
        }

        found
            .map(Path::to_path_buf)
            .ok_or_else(|| ContextError::NoSourceRoot {
                dir: self.cwd.clone(),
            })
    }

    /// Load the merged configuration for a source root.
    pub fn config(&self, root: &Path) -> Config {
        load_config(self.global_config_path(), &project_config_path(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ctx(cwd: &Path) -> GlobalContext {
        GlobalContext::with_cwd(cwd.to_path_buf()).with_global_config(None)
    }

    #[test]
    fn test_context_cwd_is_absolute() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
    }

    #[test]
    fn test_explicit_source_root_is_canonical() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("proj/sub")).unwrap();

        let root = ctx(tmp.path())
            .source_root(Some(Path::new("proj/sub/..")))
            .unwrap();
        assert_eq!(root, tmp.path().canonicalize().unwrap().join("proj"));
    }

    #[test]
    fn test_explicit_source_root_missing() {
        let tmp = TempDir::new().unwrap();
        let err = ctx(tmp.path())
            .source_root(Some(Path::new("missing")))
            .unwrap_err();
        assert!(matches!(err, ContextError::Resolve { .. }));
    }

    #[test]
    fn test_finds_outermost_cmake_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");
        let nested = root.join("src/engine");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join(CMAKE_LISTS), "project(p)").unwrap();
        fs::write(root.join("src").join(CMAKE_LISTS), "").unwrap();
        fs::write(nested.join(CMAKE_LISTS), "").unwrap();

        let found = ctx(&nested).source_root(None).unwrap();
        assert_eq!(found, root.canonicalize().unwrap());
    }

    #[test]
    fn test_cmake_chain_stops_at_gap() {
        let tmp = TempDir::new().unwrap();
        let outer = tmp.path().join("outer");
        let inner = outer.join("vendor/inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(outer.join(CMAKE_LISTS), "").unwrap();
        fs::write(inner.join(CMAKE_LISTS), "").unwrap();

        let found = ctx(&inner).source_root(None).unwrap();
        assert_eq!(found, inner.canonicalize().unwrap());
    }

    #[test]
    fn test_config_marker_wins() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");
        let sub = root.join("lib");
        fs::create_dir_all(root.join(".cxxbuild")).unwrap();
        fs::create_dir_all(&sub).unwrap();
        fs::write(project_config_path(&root), "[build]\n").unwrap();
        fs::write(sub.join(CMAKE_LISTS), "").unwrap();

        let found = ctx(&sub).source_root(None).unwrap();
        assert_eq!(found, root.canonicalize().unwrap());
    }

    #[test]
    fn test_global_config_is_not_a_marker() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let proj = home.join("proj");
        fs::create_dir_all(home.join(".cxxbuild")).unwrap();
        fs::create_dir_all(&proj).unwrap();
        fs::write(project_config_path(&home), "[build]\n").unwrap();
        fs::write(proj.join(CMAKE_LISTS), "").unwrap();

        let found = GlobalContext::with_cwd(proj.clone())
            .with_global_config(Some(project_config_path(&home)))
            .source_root(None)
            .unwrap();
        assert_eq!(found, proj.canonicalize().unwrap());
    }

    #[test]
    fn test_no_source_root() {
        let tmp = TempDir::new().unwrap();
        let err = ctx(tmp.path()).source_root(None).unwrap_err();
        assert!(matches!(err, ContextError::NoSourceRoot { .. }));
    }

    #[test]
    fn test_project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".cxxbuild")).unwrap();
        fs::write(
            project_config_path(tmp.path()),
            "[build]\ncompiler = \"clang\"\n",
        )
        .unwrap();

        let config = ctx(tmp.path()).config(tmp.path());
        assert_eq!(config.build.compiler, Some("clang".to_string()));
    }
}
