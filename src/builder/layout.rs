//! Output directory layout.
//!
//! Each toolchain/standard/profile combination gets its own directory so
//! that several configurations coexist under one source root:
//!
//! ```text
//! <root>/build/<toolchain>/cxx<standard>/<profile>
//! ```

use std::path::{Component, Path, PathBuf};

use crate::core::options::BuildOptions;

/// Name of the directory holding all build trees.
pub const BUILD_DIR_NAME: &str = "build";

/// Derive the build directory for `opts` under `root`.
///
/// Segments are taken verbatim; the profile keeps its original casing.
/// A segment that looks like an absolute path (`--compiler=/opt/gcc/bin/gcc`)
/// is nested under `build/` rather than replacing the prefix, so the result
/// always starts with `<root>/build`.
pub fn build_dir(root: &Path, opts: &BuildOptions) -> PathBuf {
    let mut dir = root.join(BUILD_DIR_NAME);
    push_segment(&mut dir, opts.toolchain.as_str());
    push_segment(&mut dir, &format!("cxx{}", opts.standard));
    push_segment(&mut dir, opts.profile.as_str());
    dir
}

/// Append `segment` as relative components only.
fn push_segment(dir: &mut PathBuf, segment: &str) {
    for component in Path::new(segment).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => dir.push(other),
        }
    }
}
