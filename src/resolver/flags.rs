//! Feature-flag extraction from the generated configuration header.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::util::fs::read_to_string;

/// Flags recognized from the configuration header. Anything else the header
/// defines is ignored; any of these missing from the header resolves to 0.
pub const RECOGNIZED_FLAGS: &[&str] = &[
    "ENABLE_PLUGINS",
    "HAVE_COMMONCRYPTO",
    "HAVE_HMAC",
    "HAVE_LIBCURL",
    "HAVE_MMAP",
];

/// The network-client capability flag.
pub const NETWORK_CLIENT_FLAG: &str = "HAVE_LIBCURL";

/// Compile-time feature flags of the configured dependency.
///
/// Always contains every recognized flag; consumers never need to handle an
/// absent key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags(BTreeMap<String, i64>);

impl FeatureFlags {
    /// The conservative all-zero table (nothing optional compiled in).
    pub fn conservative() -> Self {
        FeatureFlags(
            RECOGNIZED_FLAGS
                .iter()
                .map(|name| (name.to_string(), 0))
                .collect(),
        )
    }

    /// Extract flags from a generated header.
    ///
    /// Matches `#define NAME VALUE` lines, keeping recognized names with
    /// integer values. Extraction is idempotent: the same header always
    /// yields the same table.
    pub fn extract(header: &Path) -> Result<Self> {
        let contents = read_to_string(header)?;
        Ok(Self::parse(&contents))
    }

    /// Parse flags out of header text.
    pub fn parse(contents: &str) -> Self {
        let define = Regex::new(r"^\s*#\s*define\s+(\w+)\s+(\S+)").expect("valid regex");

        let mut flags = Self::conservative();
        for line in contents.lines() {
            let Some(caps) = define.captures(line) else {
                continue;
            };
            let name = &caps[1];
            if !RECOGNIZED_FLAGS.contains(&name) {
                continue;
            }
            if let Ok(value) = caps[2].parse::<i64>() {
                flags.0.insert(name.to_string(), value);
            }
        }
        flags
    }

    /// Value of a flag; unrecognized names read as 0.
    pub fn get(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Whether a flag is enabled (non-zero).
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name) != 0
    }

    /// Iterate over (name, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
