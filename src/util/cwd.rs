//! Scoped working-directory changes.
//!
//! The working directory is process-global, so scoped changes are serialized
//! through a lock held for the lifetime of the guard.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that changes the working directory and restores the previous
/// one when dropped, on every exit path (normal, early return, or error).
#[derive(Debug)]
pub struct ScopedDir {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedDir {
    /// Change into `path`, remembering the current directory.
    pub fn enter(path: &Path) -> Result<Self> {
        let lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = env::current_dir().context("failed to read current directory")?;
        env::set_current_dir(path)
            .with_context(|| format!("failed to change directory to {}", path.display()))?;
        Ok(ScopedDir {
            previous,
            _lock: lock,
        })
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            tracing::warn!(
                "failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
