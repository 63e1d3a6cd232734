//! Native dependency resolution.
//!
//! Decides, once per build, how the bindings locate, configure, and link
//! against htslib. The flow is strictly forward:
//!
//! ```text
//! Start -> ModeSelected -> {Configured | ConfigurationFallback}
//!       -> FlagsExtracted -> DescriptorBuilt -> ExclusionsApplied -> Done
//! ```
//!
//! Re-running from the same environment and filesystem state produces the
//! same descriptor; the only on-disk state is the generated configuration
//! header and the configuration-values file.

pub mod configure;
pub mod descriptor;
pub mod errors;
pub mod flags;
pub mod mode;
pub mod sources;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use configure::{configure_library, ConfigureOutcome, CONFIG_HEADER};
pub use descriptor::{
    apply_network_client_compensation, build_descriptor, BuildDescriptor, ExternalLocation,
    RuntimeAbi,
};
pub use errors::ResolveError;
pub use flags::{FeatureFlags, NETWORK_CLIENT_FLAG};
pub use mode::{select_mode, GeneratorProbe, ProvisioningMode, SourcePattern};

use crate::util::env::EnvSource;
use crate::util::fs::write_string;
use configure::DEFAULT_CONFIGURE_ATTEMPTS;
use sources::BINDING_MODULES;

/// Environment variable naming the directory of a pre-installed libhts.
pub const LIBRARY_DIR_VAR: &str = "HTSLIB_LIBRARY_DIR";
/// Environment variable naming the matching include directory.
pub const INCLUDE_DIR_VAR: &str = "HTSLIB_INCLUDE_DIR";
/// Environment variable carrying a configure-options string to try first.
pub const CONFIGURE_OPTIONS_VAR: &str = "HTSLIB_CONFIGURE_OPTIONS";

/// Name of the persisted configuration-values file.
pub const CONFIG_VALUES_FILE: &str = "htslib-config.toml";

/// Inputs to one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Root of the vendored htslib sources.
    pub vendored_root: PathBuf,
    /// Caller-requested provisioning mode, if any.
    pub requested_mode: Option<ProvisioningMode>,
    /// Runtime ABI of the consuming extensions.
    pub abi: RuntimeAbi,
    /// Directory holding pre-generated binding sources, when checking them
    /// is wanted.
    pub bindings_dir: Option<PathBuf>,
    /// Capability probe for the binding-source generator.
    pub generator: GeneratorProbe,
}

/// The outcome of a resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub mode: ProvisioningMode,
    pub source_pattern: SourcePattern,
    /// Configure outcome for vendored modes; `None` when configuration was
    /// skipped (external mode, or an already-configured tree).
    pub configure: Option<ConfigureOutcome>,
    pub descriptor: BuildDescriptor,
}

impl Resolution {
    /// The configure option string that won, if any attempt ran and
    /// succeeded.
    pub fn chosen_option(&self) -> Option<&str> {
        self.configure.as_ref().and_then(|c| c.option())
    }

    /// Whether configuration fell back to the conservative placeholder.
    pub fn used_fallback(&self) -> bool {
        matches!(self.configure, Some(ConfigureOutcome::NoneSucceeded))
    }

    /// Persist the configuration-values file consumed by the runtime
    /// wrapper. Returns the path written.
    pub fn write_artifacts(&self, out_dir: &Path) -> Result<PathBuf> {
        let values = ConfigValues {
            mode: self.mode,
            source_pattern: self.source_pattern,
            configure_options: self.chosen_option().map(|s| s.to_string()),
            features: self.descriptor.features.iter().map(|(k, v)| (k.to_string(), v)).collect(),
        };

        let contents =
            toml::to_string_pretty(&values).context("failed to serialize configuration values")?;
        let path = out_dir.join(CONFIG_VALUES_FILE);
        write_string(&path, &contents)?;
        Ok(path)
    }

    /// The descriptor as pretty JSON, for handing to the toolchain.
    pub fn descriptor_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.descriptor)
            .context("failed to serialize build descriptor")
    }
}

/// Persisted configuration values.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigValues {
    mode: ProvisioningMode,
    source_pattern: SourcePattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    configure_options: Option<String>,
    features: BTreeMap<String, i64>,
}

/// Resolve the build configuration.
pub fn resolve(env: &dyn EnvSource, opts: &ResolveOptions) -> Result<Resolution> {
    let library_dir = env.var(LIBRARY_DIR_VAR).map(PathBuf::from);
    let include_dir = env.var(INCLUDE_DIR_VAR).map(PathBuf::from);
    let env_options = env.var(CONFIGURE_OPTIONS_VAR);

    let source_pattern = SourcePattern::from_probe(&opts.generator);
    if source_pattern == SourcePattern::Pregenerated {
        if let Some(ref bindings_dir) = opts.bindings_dir {
            check_pregenerated_sources(bindings_dir)?;
        }
    }

    let mode = select_mode(
        library_dir.as_deref(),
        opts.requested_mode,
        &opts.generator,
    )?;
    tracing::info!("provisioning mode: {}", mode);

    let external = library_dir.map(|dir| ExternalLocation::new(dir, include_dir));

    let (configure_outcome, features) = if mode.is_vendored() {
        let header = opts.vendored_root.join(CONFIG_HEADER);
        let outcome = if header.exists() {
            tracing::debug!("{} already present; skipping configure", header.display());
            None
        } else {
            Some(configure_library(
                &opts.vendored_root,
                env_options.as_deref(),
                DEFAULT_CONFIGURE_ATTEMPTS,
            )?)
        };
        let features = FeatureFlags::extract(&header)?;
        (outcome, features)
    } else {
        // Nothing to configure; assume nothing optional is compiled in.
        (None, FeatureFlags::conservative())
    };

    let mut descriptor = build_descriptor(
        external.as_ref(),
        mode,
        &opts.abi,
        &opts.vendored_root,
        features,
    )?;

    let explicitly_enabled = configure_outcome
        .as_ref()
        .and_then(|c| c.option())
        .is_some_and(|option| option.contains("--enable-libcurl"));
    apply_network_client_compensation(&mut descriptor, explicitly_enabled);

    Ok(Resolution {
        mode,
        source_pattern,
        configure: configure_outcome,
        descriptor,
    })
}

/// Verify that every binding module's pre-generated source exists.
///
/// Only called when no generator is available; a missing file is fatal since
/// nothing can recreate it.
fn check_pregenerated_sources(bindings_dir: &Path) -> Result<()> {
    for module in BINDING_MODULES {
        let path = bindings_dir.join(format!("{}.c", module));
        if !path.exists() {
            return Err(ResolveError::MissingPregeneratedSource {
                module: module.to_string(),
                path,
            }
            .into());
        }
    }
    Ok(())
}
