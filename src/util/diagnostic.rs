//! User-facing error reports.
//!
//! Typed errors carry a `miette` help message; the binary prints the error
//! chain followed by that help, when there is one.

use miette::Diagnostic;

use crate::core::options::OptionsError;
use crate::ops::errors::RunError;
use crate::util::context::ContextError;
use crate::util::process::ProcessError;

/// Find the help text of the first diagnostic in the error chain.
pub fn help(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        let diag: &dyn Diagnostic = if let Some(e) = cause.downcast_ref::<ContextError>() {
            e
        } else if let Some(e) = cause.downcast_ref::<OptionsError>() {
            e
        } else if let Some(e) = cause.downcast_ref::<RunError>() {
            e
        } else if let Some(e) = cause.downcast_ref::<ProcessError>() {
            e
        } else {
            return None;
        };
        diag.help().map(|h| h.to_string())
    })
}

/// Format an error for terminal output.
pub fn format_error(err: &anyhow::Error, color: bool) -> String {
    let (error, help_prefix) = if color {
        ("\x1b[1;31merror\x1b[0m", "\x1b[1;32mhelp\x1b[0m")
    } else {
        ("error", "help")
    };

    let mut output = format!("{}: {:#}\n", error, err);
    if let Some(help) = help(err) {
        output.push_str(&format!("  {}: {}\n", help_prefix, help));
    }
    output
}

/// Print an error to stderr.
pub fn emit_error(err: &anyhow::Error, color: bool) {
    eprint!("{}", format_error(err, color));
}
