//! CMake invocation synthesis.
//!
//! Turns resolved [`BuildOptions`] into a configure step (CMake) and a build
//! step (make), each with an explicit working directory and environment.
//! Nothing here touches the filesystem or spawns processes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::builder::layout::build_dir;
use crate::core::options::BuildOptions;

/// The build-system generator.
pub const CMAKE: &str = "cmake";

/// The build driver.
pub const MAKE: &str = "make";

/// Environment variable holding the C compiler.
pub const CC: &str = "CC";

/// Environment variable holding the C++ compiler driver.
pub const CXX: &str = "CXX";

/// A single command: program, ordered arguments and working directory.
///
/// Arguments are kept as `OsString` so paths reach the child byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (looked up on `PATH`)
    pub program: String,
    /// Command arguments
    pub args: Vec<OsString>,
    /// Working directory
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Arguments as (lossy) UTF-8, for display and plans.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Render as a shell word list.
    pub fn display(&self) -> String {
        std::iter::once(shell_quote(&self.program))
            .chain(self.display_args().iter().map(|a| shell_quote(a)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything needed to configure and build one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    /// Source tree root (absolute)
    pub source_dir: PathBuf,
    /// Output directory for this option triple
    pub build_dir: PathBuf,
    /// Environment passed to both steps, in export order
    pub env: Vec<(String, String)>,
    /// Variables removed from the inherited environment of both steps
    pub env_remove: Vec<String>,
    /// Generator step
    pub configure: CommandSpec,
    /// Driver step
    pub build: CommandSpec,
}

/// Synthesize the invocation for `opts` with `root` as the source tree.
///
/// `root` is expected to be absolute and canonical; see
/// [`crate::util::context::GlobalContext::source_root`].
pub fn synthesize(root: &Path, opts: &BuildOptions) -> BuildInvocation {
    let build_dir = build_dir(root, opts);

    let mut env = vec![(CC.to_string(), opts.toolchain.to_string())];
    let mut env_remove = Vec::new();
    match opts.toolchain.cxx_driver() {
        Some(cxx) => env.push((CXX.to_string(), cxx.to_string())),
        None => {
            tracing::warn!(
                "unrecognized toolchain `{}`; CXX is not set, CMake will pick a C++ compiler",
                opts.toolchain
            );
            // An inherited CXX would pair a foreign driver with this CC
            env_remove.push(CXX.to_string());
        }
    }

    let configure = CommandSpec::new(CMAKE, &build_dir)
        .arg("-DCMAKE_EXPORT_COMPILE_COMMANDS=1")
        .arg(format!("-DCMAKE_BUILD_TYPE={}", opts.profile.build_type()))
        .arg("-DEXAMPLES:BOOL=ON")
        .arg(root);

    let build = CommandSpec::new(MAKE, &build_dir).arg(format!("-j{}", opts.jobs));

    BuildInvocation {
        source_dir: root.to_path_buf(),
        build_dir,
        env,
        env_remove,
        configure,
        build,
    }
}

impl BuildInvocation {
    /// Equivalent POSIX shell command line.
    ///
    /// Only for display; the executor never hands this to a shell.
    pub fn command_line(&self) -> String {
        let mut out = String::from("(");
        for (key, value) in &self.env {
            out.push_str(&format!("export {}={}; ", key, shell_quote(value)));
        }
        out.push_str(&format!(
            "cd {}; {}; {}; cd {})",
            shell_quote(&self.build_dir.to_string_lossy()),
            self.configure.display(),
            self.build.display(),
            shell_quote(&self.source_dir.to_string_lossy()),
        ));
        out
    }
}

/// Quote a word for a POSIX shell if it holds anything beyond a safe set.
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-+=:,./@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
