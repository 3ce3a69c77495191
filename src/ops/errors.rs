//! Errors raised while executing a build invocation.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::util::process::ProcessError;

/// Error executing a build invocation.
///
/// A failing configure or build step is not an error here; its exit code is
/// reported through [`crate::ops::RunOutcome`].
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error("failed to create build directory `{}`", .path.display())]
    #[diagnostic(
        code(cxxbuild::run::create_dir),
        help("Check permissions on the source tree or pick a different --compiler/--build_type")
    )]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("failed to write build summary")]
    Output(#[source] io::Error),
}
