//! cxxbuild - configure and build a CMake project per toolchain, C++
//! standard and build profile.
//!
//! The pipeline is linear: resolve [`BuildOptions`], synthesize a
//! [`BuildInvocation`], then execute it with [`ops::execute`].

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for cxxbuild unit tests.
#[cfg(test)]
pub mod test_support;

pub use builder::cmake::BuildInvocation;
pub use core::options::BuildOptions;
pub use util::context::GlobalContext;
