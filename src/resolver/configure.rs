//! Driving the vendored dependency's own configure step.
//!
//! The configure script is tried with an ordered list of option strings,
//! preferred option first, short-circuiting on the first success. A script
//! that runs and reports failure is a soft outcome; only a missing script
//! aborts the build. When no attempt succeeds, a conservative placeholder
//! header is synthesized so downstream compilation has a stable feature-flag
//! baseline instead of failing the whole build.

use std::path::Path;

use anyhow::Result;

use crate::resolver::errors::ResolveError;
use crate::util::cwd::ScopedDir;
use crate::util::fs::write_string;
use crate::util::process::ProcessBuilder;

/// Name of the generated configuration header.
pub const CONFIG_HEADER: &str = "config.h";

/// Fallback option strings tried when the environment supplies none that
/// works, in order. The empty string means "no options".
pub const DEFAULT_CONFIGURE_ATTEMPTS: &[&str] = &["--enable-libcurl", ""];

/// Conservative placeholder written when every configure attempt fails.
pub const FALLBACK_HEADER: &str = "/* minimal fallback configuration */\n\
                                   #define HAVE_LIBCURL 0\n";

/// Outcome of the configure-attempt loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// The first option string that configured successfully.
    Succeeded(String),
    /// Every attempt failed; the fallback header was synthesized.
    NoneSucceeded,
}

impl ConfigureOutcome {
    /// The winning option string, if any.
    pub fn option(&self) -> Option<&str> {
        match self {
            ConfigureOutcome::Succeeded(option) => Some(option),
            ConfigureOutcome::NoneSucceeded => None,
        }
    }
}

/// Run `library_dir`'s configure script with each candidate option string in
/// turn, preferred option first.
///
/// A missing configure script is fatal; an attempt that runs and exits
/// non-zero (or fails to spawn) is merely an unsuccessful attempt. On total
/// failure a [`FALLBACK_HEADER`] is written beside the vendored sources and
/// [`ConfigureOutcome::NoneSucceeded`] is returned.
pub fn configure_library(
    library_dir: &Path,
    preferred: Option<&str>,
    fallbacks: &[&str],
) -> Result<ConfigureOutcome> {
    let script = library_dir.join("configure");
    if !script.exists() {
        return Err(ResolveError::MissingConfigureScript { path: script }.into());
    }

    // Invoke by absolute path so a concurrent cwd change cannot redirect the
    // spawn; the guard still scopes the script's own relative output.
    let script = script.canonicalize()?;

    let _guard = ScopedDir::enter(library_dir)?;

    let attempts = preferred
        .into_iter()
        .chain(fallbacks.iter().copied())
        .collect::<Vec<_>>();

    for option in attempts {
        if run_configure(&script, option) {
            tracing::info!("configure succeeded with options `{}`", option);
            return Ok(ConfigureOutcome::Succeeded(option.to_string()));
        }
        tracing::debug!("configure attempt `{}` failed", option);
    }

    tracing::warn!(
        "no configure attempt succeeded in {}; writing fallback {}",
        library_dir.display(),
        CONFIG_HEADER
    );
    write_string(&library_dir.join(CONFIG_HEADER), FALLBACK_HEADER)?;

    Ok(ConfigureOutcome::NoneSucceeded)
}

/// Run one configure attempt. Spawn failure counts as an unsuccessful
/// attempt, the same as a non-zero exit.
fn run_configure(script: &Path, option: &str) -> bool {
    let cmd = ProcessBuilder::new(script).args(option.split_whitespace());
    tracing::debug!("running `{}`", cmd.display_command());

    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!("failed to spawn configure: {}", e);
            false
        }
    }
}
