//! Injected environment access.
//!
//! The resolver never reads the process environment directly; it goes through
//! an [`EnvSource`] so tests can supply a map-backed environment without
//! mutating process state.

/// Read-only environment lookup.
pub trait EnvSource {
    /// Look up a variable, returning `None` when unset or not valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
