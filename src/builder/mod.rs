//! Build directory layout and command synthesis.
//!
//! Everything in this module is pure: it computes paths and commands but
//! never touches the filesystem or spawns processes.

pub mod cmake;
pub mod layout;

pub use cmake::{synthesize, BuildInvocation, CommandSpec};
pub use layout::build_dir;
