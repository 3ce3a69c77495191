//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use cxxbuild::core::options::{OptionOverrides, DEFAULT_PROFILE, DEFAULT_TOOLCHAIN};
use cxxbuild::util::shell::ColorChoice;

/// cxxbuild - configure and build a CMake project per compiler, standard and profile
///
/// Each combination gets its own directory under
/// `<source>/build/<compiler>/cxx<standard>/<build_type>`.
#[derive(Parser)]
#[command(name = "cxxbuild")]
#[command(author, version, about)]
pub struct Cli {
    /// Compiler family, exported as CC (gcc, clang, ...)
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = DEFAULT_TOOLCHAIN)]
    pub compiler: Option<String>,

    /// ISO C++ standard version
    #[arg(
        long,
        value_name = "VERSION",
        num_args = 0..=1,
        default_missing_value = "17",
        allow_negative_numbers = true
    )]
    pub cxx: Option<i32>,

    /// Build profile, passed to CMake as CMAKE_BUILD_TYPE
    #[arg(
        long = "build_type",
        visible_alias = "build-type",
        value_name = "PROFILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_PROFILE
    )]
    pub build_type: Option<String>,

    /// Number of parallel build jobs
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<u32>,

    /// Source tree root (defaults to the enclosing CMake project)
    #[arg(long, value_name = "DIR", env = "CXXBUILD_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Print the build plan as JSON without creating or running anything
    #[arg(long)]
    pub plan: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    /// Options given explicitly on the command line.
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            toolchain: self.compiler.clone(),
            standard: self.cxx,
            profile: self.build_type.clone(),
            jobs: self.jobs,
        }
    }
}
