//! Build options and their resolution from command line and config files.
//!
//! A [`BuildOptions`] record is resolved once per invocation and then handed
//! to the synthesizer in [`crate::builder`]. Every field always carries a
//! value: an explicit override, a configured value, or a built-in default.

use std::fmt;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::config::Config;

/// Default toolchain identifier.
pub const DEFAULT_TOOLCHAIN: &str = "gcc";

/// Default C++ standard version.
pub const DEFAULT_STANDARD: i32 = 17;

/// Default build profile.
pub const DEFAULT_PROFILE: &str = "debug";

/// Default build driver parallelism.
pub const DEFAULT_JOBS: u32 = 4;

/// Compiler family recognized by the driver lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    Gcc,
    Clang,
}

impl CompilerFamily {
    /// Name of the C++ compiler driver for this family.
    pub fn cxx_driver(&self) -> &'static str {
        match self {
            CompilerFamily::Gcc => "g++",
            CompilerFamily::Clang => "clang++",
        }
    }
}

/// Toolchain identifier, kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Toolchain(String);

impl Toolchain {
    pub fn new(name: impl Into<String>) -> Self {
        Toolchain(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Look up the compiler family, ignoring case.
    ///
    /// Unrecognized identifiers return `None` and get no C++ driver.
    pub fn family(&self) -> Option<CompilerFamily> {
        if self.0.eq_ignore_ascii_case("gcc") {
            Some(CompilerFamily::Gcc)
        } else if self.0.eq_ignore_ascii_case("clang") {
            Some(CompilerFamily::Clang)
        } else {
            None
        }
    }

    /// The C++ compiler driver to export as `CXX`, if known.
    pub fn cxx_driver(&self) -> Option<&'static str> {
        self.family().map(|f| f.cxx_driver())
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Toolchain::new(DEFAULT_TOOLCHAIN)
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build profile label, kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(String);

impl Profile {
    pub fn new(label: impl Into<String>) -> Self {
        Profile(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value passed as `CMAKE_BUILD_TYPE`: first character uppercased,
    /// the remainder lowercased (`debug` -> `Debug`, `RELEASE` -> `Release`).
    ///
    /// Uppercasing uses the full Unicode mapping, not titlecase, so a leading
    /// `ß` becomes `SS` and digraphs like `ǆ` become `Ǆ` rather than `ǅ`.
    /// CMake's own build types are ASCII, where the two agree.
    pub fn build_type(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::new(DEFAULT_PROFILE)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully resolved options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Compiler family identifier (exported as `CC`)
    pub toolchain: Toolchain,
    /// C++ standard version, interpolated as a plain integer
    pub standard: i32,
    /// Build profile label
    pub profile: Profile,
    /// Parallelism passed to the build driver
    pub jobs: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            toolchain: Toolchain::default(),
            standard: DEFAULT_STANDARD,
            profile: Profile::default(),
            jobs: DEFAULT_JOBS,
        }
    }
}

/// Explicit overrides, typically from the command line.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub toolchain: Option<String>,
    pub standard: Option<i32>,
    pub profile: Option<String>,
    pub jobs: Option<u32>,
}

/// Error resolving build options.
#[derive(Debug, Error, Diagnostic)]
pub enum OptionsError {
    #[error("build driver parallelism must be at least 1")]
    #[diagnostic(
        code(cxxbuild::options::zero_jobs),
        help("Pass `--jobs <N>` with N >= 1 or remove `jobs = 0` from the config file")
    )]
    ZeroJobs,
}

impl BuildOptions {
    /// Resolve options with precedence: overrides > config > defaults.
    pub fn resolve(overrides: OptionOverrides, config: &Config) -> Result<Self, OptionsError> {
        let build = &config.build;

        let toolchain = overrides
            .toolchain
            .or_else(|| build.compiler.clone())
            .map(Toolchain::new)
            .unwrap_or_default();

        let standard = overrides
            .standard
            .or(build.cxx)
            .unwrap_or(DEFAULT_STANDARD);

        let profile = overrides
            .profile
            .or_else(|| build.build_type.clone())
            .map(Profile::new)
            .unwrap_or_default();

        let jobs = overrides.jobs.or(build.jobs).unwrap_or(DEFAULT_JOBS);
        if jobs == 0 {
            return Err(OptionsError::ZeroJobs);
        }

        let opts = BuildOptions {
            toolchain,
            standard,
            profile,
            jobs,
        };
        tracing::debug!(?opts, "resolved build options");
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = BuildOptions::resolve(OptionOverrides::default(), &Config::default()).unwrap();
        assert_eq!(opts.toolchain.as_str(), "gcc");
        assert_eq!(opts.standard, 17);
        assert_eq!(opts.profile.as_str(), "debug");
        assert_eq!(opts.jobs, 4);
        assert_eq!(opts, BuildOptions::default());
    }

    #[test]
    fn test_toolchain_family_ignores_case() {
        assert_eq!(Toolchain::new("gcc").family(), Some(CompilerFamily::Gcc));
        assert_eq!(Toolchain::new("GCC").family(), Some(CompilerFamily::Gcc));
        assert_eq!(Toolchain::new("Clang").family(), Some(CompilerFamily::Clang));
        assert_eq!(Toolchain::new("msvc").family(), None);
        assert_eq!(Toolchain::new("gcc-13").family(), None);
    }

    #[test]
    fn test_cxx_driver() {
        assert_eq!(Toolchain::new("Gcc").cxx_driver(), Some("g++"));
        assert_eq!(Toolchain::new("CLANG").cxx_driver(), Some("clang++"));
        assert_eq!(Toolchain::new("icx").cxx_driver(), None);
    }

    #[test]
    fn test_profile_build_type() {
        assert_eq!(Profile::new("debug").build_type(), "Debug");
        assert_eq!(Profile::new("RELEASE").build_type(), "Release");
        assert_eq!(Profile::new("relWithDebInfo").build_type(), "Relwithdebinfo");
        assert_eq!(Profile::new("").build_type(), "");
    }

    #[test]
    fn test_profile_build_type_non_ascii() {
        assert_eq!(Profile::new("ßuild").build_type(), "SSuild");
        assert_eq!(Profile::new("éTÉ").build_type(), "Été");
    }

    #[test]
    fn test_overrides_beat_config() {
        let mut config = Config::default();
        config.build.compiler = Some("clang".to_string());
        config.build.cxx = Some(20);
        config.build.jobs = Some(8);

        let overrides = OptionOverrides {
            toolchain: Some("gcc".to_string()),
            profile: Some("release".to_string()),
            ..Default::default()
        };
        let opts = BuildOptions::resolve(overrides, &config).unwrap();

        assert_eq!(opts.toolchain.as_str(), "gcc");
        assert_eq!(opts.standard, 20);
        assert_eq!(opts.profile.as_str(), "release");
        assert_eq!(opts.jobs, 8);
    }

    #[test]
    fn test_negative_standard_is_kept() {
        let overrides = OptionOverrides {
            standard: Some(-3),
            ..Default::default()
        };
        let opts = BuildOptions::resolve(overrides, &Config::default()).unwrap();
        assert_eq!(opts.standard, -3);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let overrides = OptionOverrides {
            jobs: Some(0),
            ..Default::default()
        };
        let err = BuildOptions::resolve(overrides, &Config::default()).unwrap_err();
        assert!(matches!(err, OptionsError::ZeroJobs));
    }
}
