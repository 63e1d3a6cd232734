//! Build-variable generation.
//!
//! Turns the resolved provisioning mode into the normalized descriptor the
//! compiler/linker step consumes: include/library search paths, internal and
//! external link libraries, and the per-mode vendored source lists. Produced
//! exactly once per build and read-only afterward.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::resolver::errors::ResolveError;
use crate::resolver::flags::{FeatureFlags, NETWORK_CLIENT_FLAG};
use crate::resolver::mode::ProvisioningMode;
use crate::resolver::sources::{
    collect_vendored_sources, prune_source, HTSLIB_EXCLUDE, NETWORK_CLIENT_SOURCE,
};

/// The compression library every mode links against.
pub const COMPRESSION_LIBRARY: &str = "z";

/// The core native library, linked only in external mode.
pub const CORE_LIBRARY: &str = "hts";

/// Extra external libraries appended when the network client is explicitly
/// enabled: transport and cryptographic-hash backends.
pub const NETWORK_CLIENT_LIBRARIES: &[&str] = &["curl", "crypto"];

/// Where a pre-installed copy of the dependency lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLocation {
    pub library_dir: PathBuf,
    pub include_dir: PathBuf,
}

impl ExternalLocation {
    /// Build from the externally supplied directories. The include dir
    /// defaults to `<library dir>/include` when not given.
    pub fn new(library_dir: PathBuf, include_dir: Option<PathBuf>) -> Self {
        let include_dir = include_dir.unwrap_or_else(|| library_dir.join("include"));
        ExternalLocation {
            library_dir,
            include_dir,
        }
    }
}

/// Runtime ABI of the consuming extension modules, used to qualify the
/// internal shared library's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeAbi {
    /// ABI tag of the consuming runtime (e.g. `cp312`).
    pub tag: String,
    /// Operating system (`linux`, `macos`, `windows`, ...).
    pub os: String,
    /// CPU architecture (`x86_64`, `aarch64`, ...).
    pub arch: String,
}

impl RuntimeAbi {
    /// ABI for the host platform with the given tag.
    pub fn host(tag: impl Into<String>) -> Self {
        RuntimeAbi {
            tag: tag.into(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// Name of the internal shared library in vendored-shared mode.
///
/// The dynamic loader's lookup rules differ per platform, so the qualifier
/// does too: Windows resolves by import library name alone, macOS embeds the
/// install name, and ELF platforms get the full tag-arch qualifier.
pub fn internal_library_name(abi: &RuntimeAbi) -> String {
    match abi.os.as_str() {
        "windows" => "chtslib".to_string(),
        "macos" => format!("chtslib.{}-darwin", abi.tag),
        _ => format!("chtslib.{}-{}-{}-gnu", abi.tag, abi.arch, abi.os),
    }
}

/// The resolved, normalized set of paths and libraries handed to the
/// compiler/linker for a given build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub mode: ProvisioningMode,
    /// Header search paths, in order.
    pub include_dirs: Vec<PathBuf>,
    /// Library search paths, in order.
    pub library_dirs: Vec<PathBuf>,
    /// Internal libraries (built from the vendored sources) each extension
    /// links against.
    pub internal_libraries: Vec<String>,
    /// External libraries each extension links against.
    pub external_libraries: Vec<String>,
    /// Vendored sources compiled into each extension independently.
    pub separate_sources: Vec<PathBuf>,
    /// Vendored sources compiled once into the internal shared library.
    pub shared_sources: Vec<PathBuf>,
    /// Compile-time feature flags of the configured dependency.
    pub features: FeatureFlags,
}

/// Generate the build variables for the resolved mode.
///
/// Pure apart from reading the vendored source tree; exhaustive over the
/// three provisioning modes.
pub fn build_descriptor(
    external: Option<&ExternalLocation>,
    mode: ProvisioningMode,
    abi: &RuntimeAbi,
    vendored_root: &Path,
    features: FeatureFlags,
) -> Result<BuildDescriptor> {
    let descriptor = match mode {
        ProvisioningMode::External => {
            let location = external.ok_or(ResolveError::MissingExternalLibraryDir)?;
            BuildDescriptor {
                mode,
                include_dirs: vec![location.include_dir.clone()],
                library_dirs: vec![location.library_dir.clone()],
                internal_libraries: Vec::new(),
                external_libraries: vec![
                    COMPRESSION_LIBRARY.to_string(),
                    CORE_LIBRARY.to_string(),
                ],
                separate_sources: Vec::new(),
                shared_sources: Vec::new(),
                features,
            }
        }

        ProvisioningMode::VendoredSeparate => BuildDescriptor {
            mode,
            include_dirs: vec![vendored_root.to_path_buf()],
            library_dirs: Vec::new(),
            internal_libraries: Vec::new(),
            external_libraries: vec![COMPRESSION_LIBRARY.to_string()],
            separate_sources: collect_vendored_sources(vendored_root, HTSLIB_EXCLUDE)?,
            shared_sources: Vec::new(),
            features,
        },

        ProvisioningMode::VendoredShared => BuildDescriptor {
            mode,
            include_dirs: vec![vendored_root.to_path_buf()],
            library_dirs: vec![vendored_root.to_path_buf()],
            internal_libraries: vec![internal_library_name(abi)],
            external_libraries: vec![COMPRESSION_LIBRARY.to_string()],
            separate_sources: Vec::new(),
            shared_sources: collect_vendored_sources(vendored_root, HTSLIB_EXCLUDE)?,
            features,
        },
    };

    Ok(descriptor)
}

/// Compensate for the resolved network-client capability.
///
/// When the flag is off (configuration failed, the caller disabled it, or it
/// was never enabled), the transport source is pruned from both vendored
/// lists so compilation does not hit a missing dependency. When the caller
/// explicitly enabled it, the transport and hash backends are appended to the
/// external libraries, each at most once.
pub fn apply_network_client_compensation(
    descriptor: &mut BuildDescriptor,
    explicitly_enabled: bool,
) {
    if !descriptor.features.is_enabled(NETWORK_CLIENT_FLAG) {
        tracing::debug!(
            "network client unavailable; excluding {}",
            NETWORK_CLIENT_SOURCE
        );
        prune_source(&mut descriptor.separate_sources, NETWORK_CLIENT_SOURCE);
        prune_source(&mut descriptor.shared_sources, NETWORK_CLIENT_SOURCE);
        return;
    }

    if explicitly_enabled {
        for lib in NETWORK_CLIENT_LIBRARIES {
            if !descriptor.external_libraries.iter().any(|l| l == lib) {
                descriptor.external_libraries.push(lib.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_vendored_tree;

    fn abi() -> RuntimeAbi {
        RuntimeAbi {
            tag: "cp312".to_string(),
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
        }
    }

    #[test]
    fn test_external_descriptor_matches_supplied_dirs() {
        let location = ExternalLocation::new(
            PathBuf::from("/usr/local"),
            Some(PathBuf::from("/usr/local/include")),
        );
        let descriptor = build_descriptor(
            Some(&location),
            ProvisioningMode::External,
            &abi(),
            Path::new("/unused"),
            FeatureFlags::conservative(),
        )
        .unwrap();

        assert_eq!(descriptor.library_dirs, vec![PathBuf::from("/usr/local")]);
        assert_eq!(
            descriptor.include_dirs,
            vec![PathBuf::from("/usr/local/include")]
        );
        assert_eq!(descriptor.external_libraries, vec!["z", "hts"]);
        assert!(descriptor.separate_sources.is_empty());
        assert!(descriptor.shared_sources.is_empty());
        assert!(descriptor.internal_libraries.is_empty());
    }

    #[test]
    fn test_external_include_dir_defaults_under_library_dir() {
        let location = ExternalLocation::new(PathBuf::from("/usr/local"), None);
        assert_eq!(location.include_dir, PathBuf::from("/usr/local/include"));
    }

    #[test]
    fn test_separate_descriptor_compiles_sources_per_extension() {
        let tmp = tempfile::tempdir().unwrap();
        scratch_vendored_tree(tmp.path(), &["hts.c", "bgzf.c", "tabix.c"]);

        let descriptor = build_descriptor(
            None,
            ProvisioningMode::VendoredSeparate,
            &abi(),
            tmp.path(),
            FeatureFlags::conservative(),
        )
        .unwrap();

        assert_eq!(descriptor.separate_sources.len(), 2); // tabix.c excluded
        assert!(descriptor.shared_sources.is_empty());
        assert!(descriptor.internal_libraries.is_empty());
        assert_eq!(descriptor.external_libraries, vec!["z"]);
    }

    #[test]
    fn test_shared_descriptor_links_internal_library() {
        let tmp = tempfile::tempdir().unwrap();
        scratch_vendored_tree(tmp.path(), &["hts.c"]);

        let descriptor = build_descriptor(
            None,
            ProvisioningMode::VendoredShared,
            &abi(),
            tmp.path(),
            FeatureFlags::conservative(),
        )
        .unwrap();

        assert_eq!(
            descriptor.internal_libraries,
            vec!["chtslib.cp312-x86_64-linux-gnu"]
        );
        assert_eq!(descriptor.shared_sources.len(), 1);
        assert!(descriptor.separate_sources.is_empty());
    }

    #[test]
    fn test_internal_library_name_per_platform() {
        let mut abi = abi();
        assert_eq!(
            internal_library_name(&abi),
            "chtslib.cp312-x86_64-linux-gnu"
        );

        abi.os = "macos".to_string();
        assert_eq!(internal_library_name(&abi), "chtslib.cp312-darwin");

        abi.os = "windows".to_string();
        assert_eq!(internal_library_name(&abi), "chtslib");
    }

    #[test]
    fn test_disabled_network_client_prunes_transport_source() {
        let tmp = tempfile::tempdir().unwrap();
        scratch_vendored_tree(tmp.path(), &["hts.c", "hfile_libcurl.c"]);

        let mut descriptor = build_descriptor(
            None,
            ProvisioningMode::VendoredShared,
            &abi(),
            tmp.path(),
            FeatureFlags::conservative(),
        )
        .unwrap();
        apply_network_client_compensation(&mut descriptor, false);

        let has_transport = |sources: &[PathBuf]| {
            sources
                .iter()
                .any(|p| p.file_name().unwrap() == "hfile_libcurl.c")
        };
        assert!(!has_transport(&descriptor.shared_sources));
        assert!(!has_transport(&descriptor.separate_sources));
    }

    #[test]
    fn test_enabled_network_client_appends_backends_once() {
        let tmp = tempfile::tempdir().unwrap();
        scratch_vendored_tree(tmp.path(), &["hts.c", "hfile_libcurl.c"]);

        let flags = FeatureFlags::parse("#define HAVE_LIBCURL 1\n");
        let mut descriptor = build_descriptor(
            None,
            ProvisioningMode::VendoredShared,
            &abi(),
            tmp.path(),
            flags,
        )
        .unwrap();

        apply_network_client_compensation(&mut descriptor, true);
        apply_network_client_compensation(&mut descriptor, true);

        for lib in NETWORK_CLIENT_LIBRARIES {
            let count = descriptor
                .external_libraries
                .iter()
                .filter(|l| l == lib)
                .count();
            assert_eq!(count, 1, "{} should appear exactly once", lib);
        }
        // Transport source stays in when the flag is on.
        assert!(descriptor
            .shared_sources
            .iter()
            .any(|p| p.file_name().unwrap() == "hfile_libcurl.c"));
    }
}
