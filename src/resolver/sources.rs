//! Vendored source collection and exclusion tables.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::glob_files;

/// Vendored sources never compiled into the bindings: files defining
/// conflicting program entry points, or requiring optional dependencies we
/// do not carry.
pub const HTSLIB_EXCLUDE: &[&str] = &[
    "bgzip.c",
    "hfile_irods.c", // requires the irods client library
    "htsfile.c",
    "tabix.c",
];

/// The source implementing the network-client transport. Pruned by the
/// exclusion compensator when `HAVE_LIBCURL` resolved to 0.
pub const NETWORK_CLIENT_SOURCE: &str = "hfile_libcurl.c";

/// Binding modules whose pre-generated sources must exist when no generator
/// is available.
pub const BINDING_MODULES: &[&str] = &[
    "chtslib",
    "csamtools",
    "cbcftools",
    "ctabix",
    "cfaidx",
    "cvcf",
];

/// Collect the vendored C sources under `root`, excluding `exclude` by file
/// name. The returned list is sorted and deduplicated.
pub fn collect_vendored_sources(root: &Path, exclude: &[&str]) -> Result<Vec<PathBuf>> {
    let files = glob_files(root, &["*.c", "cram/*.c"])?;

    Ok(files
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| !exclude.contains(&name))
                .unwrap_or(false)
        })
        .collect())
}

/// Remove `file_name` from a source list, by file name.
pub fn prune_source(sources: &mut Vec<PathBuf>, file_name: &str) {
    sources.retain(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| name != file_name)
            .unwrap_or(true)
    });
}
