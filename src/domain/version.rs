//! Version specifications and semantic version parsing
//!
//! A `VersionSpec` pairs the range declared in a manifest (e.g. `^4.17.0`)
//! with the concrete version it resolves to, when that is known.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared range paired with a resolved concrete version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// The range as written in the manifest or suggested by the engine
    pub range: String,
    /// The concrete version, `None` when unresolvable
    pub version: Option<String>,
}

impl VersionSpec {
    /// Creates a new VersionSpec
    pub fn new(range: impl Into<String>, version: Option<String>) -> Self {
        Self {
            range: range.into(),
            version,
        }
    }

    /// Returns the concrete version parsed as a semantic version
    pub fn parsed(&self) -> Option<Version> {
        self.version.as_deref().and_then(parse_version)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}", version),
            None => write!(f, "{}", self.range),
        }
    }
}

/// Parse a concrete version string, tolerating surrounding whitespace and a leading `v`
pub fn parse_version(s: &str) -> Option<Version> {
    let s = s.trim();
    let s = s.strip_prefix('v').unwrap_or(s);
    Version::parse(s).ok()
}
