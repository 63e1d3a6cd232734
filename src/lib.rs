//! htslink - build-configuration resolver for htslib-based binding builds.
//!
//! Decides how a consuming build locates, configures, and links against
//! htslib: a pre-installed external copy, or the vendored copy compiled
//! per-extension or into a shared internal library. Produces a normalized
//! build descriptor (paths, link libraries, source lists, feature flags)
//! for the compiler/linker step.

pub mod resolver;
pub mod util;

/// Test utilities for htslink unit tests.
///
/// Only available when running tests; provides a map-backed environment and
/// fixture builders for scratch vendored trees.
#[cfg(test)]
pub mod test_support;

pub use resolver::{
    resolve, BuildDescriptor, ConfigureOutcome, FeatureFlags, GeneratorProbe, ProvisioningMode,
    Resolution, ResolveError, ResolveOptions, RuntimeAbi, SourcePattern,
};
pub use util::env::{EnvSource, SystemEnv};
