//! Fatal resolution errors and diagnostics.
//!
//! Soft outcomes (a configure attempt failing, an optional feature being
//! unavailable) are values, not errors; only conditions that must abort the
//! build live here.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error during build-configuration resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("configure script not found at `{path}`")]
    MissingConfigureScript { path: PathBuf },

    #[error("unrecognized provisioning mode `{value}`")]
    UnknownMode { value: String },

    #[error("external mode requested but no external library directory is set")]
    MissingExternalLibraryDir,

    #[error("pre-generated source for binding module `{module}` not found at `{path}`")]
    MissingPregeneratedSource { module: String, path: PathBuf },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::MissingConfigureScript { path } => {
                Diagnostic::error("configure script not found")
                    .with_location(path.clone())
                    .with_context("the vendored htslib tree looks incomplete")
                    .with_suggestion(
                        "restore the vendored sources, or point HTSLIB_LIBRARY_DIR at an \
                         installed htslib",
                    )
            }

            ResolveError::UnknownMode { value } => {
                Diagnostic::error(format!("unrecognized provisioning mode `{}`", value))
                    .with_suggestion("valid modes are `external`, `separate`, and `shared`")
            }

            ResolveError::MissingExternalLibraryDir => {
                Diagnostic::error("external mode requires a library directory")
                    .with_suggestion("set HTSLIB_LIBRARY_DIR to the directory containing libhts")
            }

            ResolveError::MissingPregeneratedSource { module, path } => {
                Diagnostic::error(format!(
                    "pre-generated source for binding module `{}` is missing",
                    module
                ))
                .with_location(path.clone())
                .with_context("no binding-source generator is available to recreate it")
                .with_suggestion("install cython, or restore the pre-generated sources")
            }
        }
    }
}
