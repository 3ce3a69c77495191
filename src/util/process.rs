//! Subprocess execution utilities.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use miette::Diagnostic;
use thiserror::Error;

use crate::builder::cmake::CommandSpec;

/// Error launching a subprocess.
#[derive(Debug, Error, Diagnostic)]
pub enum ProcessError {
    #[error("`{program}` not found in PATH")]
    #[diagnostic(
        code(cxxbuild::process::not_found),
        help("Install `{program}` and make sure it is on your PATH")
    )]
    NotFound { program: String },

    #[error("failed to execute `{program}`")]
    #[diagnostic(code(cxxbuild::process::spawn))]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    env: BTreeMap<String, String>,
    env_remove: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            env_remove: Vec::new(),
            cwd: None,
        }
    }

    /// Build from a synthesized command plus its environment changes.
    pub fn from_spec(spec: &CommandSpec, env: &[(String, String)], env_remove: &[String]) -> Self {
        let mut pb = ProcessBuilder::new(&spec.program)
            .args(&spec.args)
            .cwd(&spec.cwd);
        for (key, value) in env {
            pb = pb.env(key, value);
        }
        for key in env_remove {
            pb = pb.env_remove(key);
        }
        pb
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env_remove.retain(|k| k != key.as_ref());
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Remove a variable from the inherited environment.
    pub fn env_remove(mut self, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_string();
        self.env.remove(&key);
        self.env_remove.push(key);
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Get an environment override.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Check whether a variable is removed from the inherited environment.
    pub fn is_env_removed(&self, key: &str) -> bool {
        self.env_remove.iter().any(|k| k == key)
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.args);

        for key in &self.env_remove {
            cmd.env_remove(key);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with inherited stdio and wait for completion.
    pub fn status(&self) -> Result<ExitStatus, ProcessError> {
        let program_name = self.program.display().to_string();
        let program = find_executable(&self.program).ok_or_else(|| ProcessError::NotFound {
            program: program_name.clone(),
        })?;

        tracing::debug!("running `{}`", self.display_command());
        self.build_command(&program)
            .status()
            .map_err(|source| ProcessError::Spawn {
                program: program_name,
                source,
            })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Runs processes to completion and reports their exit code.
///
/// The seam between the executor and the operating system.
pub trait CommandRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<i32, ProcessError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<i32, ProcessError> {
        let status = cmd.status()?;
        Ok(exit_code(status))
    }
}

/// Map an exit status to a process exit code.
///
/// Signal termination on Unix follows the shell convention of `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Find an executable in PATH (or check an explicit path).
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["-DCMAKE_BUILD_TYPE=Debug", "/src"]);

        assert_eq!(pb.display_command(), "cmake -DCMAKE_BUILD_TYPE=Debug /src");
    }

    #[test]
    fn test_from_spec() {
        let spec = CommandSpec::new("make", "/b").arg("-j4");
        let env = vec![("CC".to_string(), "clang".to_string())];
        let pb = ProcessBuilder::from_spec(&spec, &env, &["CXX".to_string()]);

        assert_eq!(pb.get_program(), Path::new("make"));
        assert_eq!(pb.get_args(), ["-j4"]);
        assert_eq!(pb.get_cwd(), Some(Path::new("/b")));
        assert_eq!(pb.get_env("CC"), Some("clang"));
        assert_eq!(pb.get_env("CXX"), None);
        assert!(pb.is_env_removed("CXX"));
        assert!(!pb.is_env_removed("CC"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_argument_is_kept() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/src/caf\xe9");
        let pb = ProcessBuilder::new("cmake").arg(raw);
        assert_eq!(pb.get_args()[0], raw);
        assert_eq!(pb.display_command(), "cmake /src/caf\u{fffd}");
    }

    #[test]
    fn test_missing_program() {
        let err = ProcessBuilder::new("cxxbuild-definitely-not-a-program")
            .status()
            .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_propagates_exit_code() {
        let tmp = tempfile::TempDir::new().unwrap();
        let pb = ProcessBuilder::new("sh").args(["-c", "exit 3"]).cwd(tmp.path());
        assert_eq!(SystemRunner.run(&pb).unwrap(), 3);

        let pb = ProcessBuilder::new("sh").args(["-c", "test \"$CC\" = clang"]).env("CC", "clang");
        assert_eq!(SystemRunner.run(&pb).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_env_remove_hides_inherited_variable() {
        // cargo exports this to every test process
        let pb = ProcessBuilder::new("sh")
            .args(["-c", "test -z \"${CARGO_MANIFEST_DIR+set}\""])
            .env_remove("CARGO_MANIFEST_DIR");
        assert_eq!(SystemRunner.run(&pb).unwrap(), 0);
    }
}
