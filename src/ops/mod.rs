//! High-level operations.

pub mod cxxbuild_run;
pub mod errors;

pub use cxxbuild_run::{execute, plan, BuildPlan, RunOutcome, Step};
pub use errors::RunError;
