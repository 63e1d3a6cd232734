//! Provisioning mode selection.
//!
//! How the build links against htslib:
//! - `External`: a pre-installed libhts outside this tree.
//! - `VendoredSeparate`: the vendored sources are compiled into each
//!   consuming extension independently. No inter-module dependencies, but
//!   wasteful in compile time and memory.
//! - `VendoredShared`: the vendored sources are compiled once into an
//!   internal shared library that every extension links against.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resolver::errors::ResolveError;
use crate::util::process::find_executable;

/// Name of the optional binding-source generator probed on PATH.
pub const GENERATOR_TOOL: &str = "cython";

/// Linkage strategy for the native dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningMode {
    #[serde(rename = "external")]
    External,
    #[serde(rename = "separate")]
    VendoredSeparate,
    #[serde(rename = "shared")]
    VendoredShared,
}

impl ProvisioningMode {
    pub fn is_vendored(&self) -> bool {
        !matches!(self, ProvisioningMode::External)
    }
}

impl FromStr for ProvisioningMode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "external" => Ok(ProvisioningMode::External),
            "separate" => Ok(ProvisioningMode::VendoredSeparate),
            "shared" => Ok(ProvisioningMode::VendoredShared),
            other => Err(ResolveError::UnknownMode {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProvisioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisioningMode::External => write!(f, "external"),
            ProvisioningMode::VendoredSeparate => write!(f, "separate"),
            ProvisioningMode::VendoredShared => write!(f, "shared"),
        }
    }
}

/// Result of probing for the optional binding-source generator.
///
/// Availability alone decides which binding-source pattern is used and the
/// default vendored mode; the generator is never invoked from the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorProbe {
    Available(PathBuf),
    Unavailable,
}

impl GeneratorProbe {
    /// Probe PATH for the generator tool.
    pub fn detect() -> Self {
        match find_executable(GENERATOR_TOOL) {
            Some(path) => GeneratorProbe::Available(path),
            None => GeneratorProbe::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, GeneratorProbe::Available(_))
    }
}

/// Which binding sources the build compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePattern {
    /// Generator output, produced from the binding definitions.
    Generated,
    /// Pre-generated sources shipped in the tree.
    Pregenerated,
}

impl fmt::Display for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePattern::Generated => write!(f, "generated"),
            SourcePattern::Pregenerated => write!(f, "pregenerated"),
        }
    }
}

impl SourcePattern {
    pub fn from_probe(probe: &GeneratorProbe) -> Self {
        if probe.is_available() {
            SourcePattern::Generated
        } else {
            SourcePattern::Pregenerated
        }
    }
}

/// Select the provisioning mode.
///
/// An externally supplied library directory always wins. Otherwise the
/// caller-requested vendored mode is honored, defaulting to shared when the
/// generator is available and separate when it is not.
pub fn select_mode(
    external_library_dir: Option<&Path>,
    requested: Option<ProvisioningMode>,
    generator: &GeneratorProbe,
) -> Result<ProvisioningMode, ResolveError> {
    if external_library_dir.is_some() {
        return Ok(ProvisioningMode::External);
    }

    match requested {
        Some(ProvisioningMode::External) => Err(ResolveError::MissingExternalLibraryDir),
        Some(mode) => Ok(mode),
        None => {
            if generator.is_available() {
                Ok(ProvisioningMode::VendoredShared)
            } else {
                Ok(ProvisioningMode::VendoredSeparate)
            }
        }
    }
}
