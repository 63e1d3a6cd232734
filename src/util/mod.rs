//! Shared utilities

pub mod cwd;
pub mod diagnostic;
pub mod env;
pub mod fs;
pub mod process;

pub use cwd::ScopedDir;
pub use diagnostic::Diagnostic;
pub use env::{EnvSource, SystemEnv};
