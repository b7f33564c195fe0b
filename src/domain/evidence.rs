//! Evidence links supporting an upgrade recommendation

use serde::{Deserialize, Serialize};

/// Links discovered for a candidate; any subset may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceLinks {
    /// GitHub compare URL between the installed and target tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare: Option<String>,
    /// `npm diff` command between installed and target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm_diff_link: Option<String>,
    /// GitHub releases page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub releases: Option<String>,
    /// Changelog file in the repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}

impl EvidenceLinks {
    pub fn is_empty(&self) -> bool {
        self.compare.is_none()
            && self.npm_diff_link.is_none()
            && self.releases.is_none()
            && self.changelog.is_none()
    }
}

/// Evidence for a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub links: EvidenceLinks,
}

impl Evidence {
    /// Wrap links into evidence, or `None` when no link was established
    pub fn from_links(links: EvidenceLinks) -> Option<Self> {
        if links.is_empty() {
            None
        } else {
            Some(Self { links })
        }
    }
}
