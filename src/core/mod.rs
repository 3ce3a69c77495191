//! Core data model.

pub mod options;

pub use options::{BuildOptions, Profile, Toolchain};
