//! Semantic-version risk classification

use super::parse_version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Risk group of an upgrade from an installed to a target version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskGroup {
    Major,
    Minor,
    Patch,
    Prerelease,
    None,
    Unknown,
}

impl RiskGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskGroup::Major => "major",
            RiskGroup::Minor => "minor",
            RiskGroup::Patch => "patch",
            RiskGroup::Prerelease => "prerelease",
            RiskGroup::None => "none",
            RiskGroup::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify the upgrade from `installed` to `target`.
///
/// Missing or unparseable versions, and downgrades, are `Unknown`. A target
/// carrying a prerelease tag is `Prerelease` whatever the numeric change.
/// Otherwise the first differing numeric component decides. Build metadata
/// is ignored.
pub fn classify_risk_group(installed: Option<&str>, target: Option<&str>) -> RiskGroup {
    let (Some(installed), Some(target)) = (
        installed.and_then(parse_version),
        target.and_then(parse_version),
    ) else {
        return RiskGroup::Unknown;
    };

    match installed.cmp_precedence(&target) {
        Ordering::Greater => return RiskGroup::Unknown,
        Ordering::Equal => return RiskGroup::None,
        Ordering::Less => {}
    }

    if !target.pre.is_empty() {
        RiskGroup::Prerelease
    } else if target.major != installed.major {
        RiskGroup::Major
    } else if target.minor != installed.minor {
        RiskGroup::Minor
    } else {
        // Same numeric triple only happens for prerelease -> release
        RiskGroup::Patch
    }
}
