//! Test utilities for htslink unit tests.
//!
//! Provides a map-backed environment and fixture builders for scratch
//! vendored source trees and stub configure scripts, so resolver tests never
//! touch the process environment or a real htslib checkout.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::util::env::EnvSource;

/// Map-backed environment for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        MapEnv::default()
    }

    /// Set a variable, builder style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Create a scratch vendored source tree with the given files (relative
/// paths; parents are created).
pub fn scratch_vendored_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "/* scratch */\n").unwrap();
    }
}

/// How a stub configure script behaves.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Exit non-zero on every invocation.
    AlwaysFail,
    /// Write a minimal header and exit zero.
    AlwaysSucceed,
    /// Succeed (writing a minimal header) only when invoked with exactly
    /// this option.
    SucceedOnOption(String),
    /// Write the given header content and exit zero.
    SucceedWithHeader(String),
}

/// Write an executable stub `configure` script into `dir`.
///
/// The script writes its header next to itself, so a concurrent working-
/// directory change in another test cannot misplace the output.
#[cfg(unix)]
pub fn stub_configure(dir: &Path, behavior: StubBehavior) {
    use std::os::unix::fs::PermissionsExt;

    const DEFAULT_HEADER: &str = "#define HAVE_MMAP 1\n";

    let write_header = |content: &str| {
        format!(
            "cat > \"$(dirname \"$0\")/config.h\" <<'HTSLINK_EOF'\n{}HTSLINK_EOF\n",
            content
        )
    };

    let body = match behavior {
        StubBehavior::AlwaysFail => "exit 1\n".to_string(),
        StubBehavior::AlwaysSucceed => format!("{}exit 0\n", write_header(DEFAULT_HEADER)),
        StubBehavior::SucceedOnOption(option) => format!(
            "if [ \"$1\" = \"{}\" ]; then\n{}exit 0\nfi\nexit 1\n",
            option,
            write_header(DEFAULT_HEADER)
        ),
        StubBehavior::SucceedWithHeader(header) => {
            format!("{}exit 0\n", write_header(&header))
        }
    };

    let script = dir.join("configure");
    fs::write(&script, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().set("HTSLIB_LIBRARY_DIR", "/usr/local");
        assert_eq!(
            env.var("HTSLIB_LIBRARY_DIR"),
            Some("/usr/local".to_string())
        );
        assert_eq!(env.var("HTSLIB_INCLUDE_DIR"), None);
    }

    #[test]
    fn test_scratch_tree_creates_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        scratch_vendored_tree(tmp.path(), &["hts.c", "cram/cram_io.c"]);
        assert!(tmp.path().join("hts.c").is_file());
        assert!(tmp.path().join("cram/cram_io.c").is_file());
    }
}
