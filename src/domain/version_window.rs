//! Version windows: published versions between installed and target
//!
//! The window counts every published version in `[installed, target]`
//! except the installed one, bucketed by the kind of bump it represents
//! relative to the installed version.

use super::parse_version;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Counts of intermediate versions per bump kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDelta {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: u32,
}

impl VersionDelta {
    /// Total number of versions counted
    pub fn total(&self) -> u32 {
        self.major + self.minor + self.patch + self.prerelease
    }
}

/// The version window of a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionWindow {
    pub delta: VersionDelta,
}

impl VersionWindow {
    /// Compute the window from `installed` to `target` over the published versions.
    ///
    /// Returns the empty window when either bound is missing or unparseable,
    /// or when installed is newer than target. Unparseable published
    /// versions are ignored.
    pub fn between<'a>(
        installed: Option<&str>,
        target: Option<&str>,
        published: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let (Some(installed), Some(target)) = (
            installed.and_then(parse_version),
            target.and_then(parse_version),
        ) else {
            return Self::default();
        };

        if installed.cmp_precedence(&target) == Ordering::Greater {
            return Self::default();
        }

        let mut in_range: Vec<Version> = published
            .into_iter()
            .filter_map(parse_version)
            .filter(|v| {
                installed.cmp_precedence(v) != Ordering::Greater
                    && v.cmp_precedence(&target) != Ordering::Greater
            })
            .collect();
        in_range.sort_by(|a, b| a.cmp_precedence(b));

        let mut delta = VersionDelta::default();
        for version in in_range
            .iter()
            .filter(|v| v.cmp_precedence(&installed) != Ordering::Equal)
        {
            if !version.pre.is_empty() {
                delta.prerelease += 1;
            } else if version.major > installed.major {
                delta.major += 1;
            } else if version.major == installed.major && version.minor > installed.minor {
                delta.minor += 1;
            } else if version.major == installed.major
                && version.minor == installed.minor
                && version.patch > installed.patch
            {
                delta.patch += 1;
            }
        }

        Self { delta }
    }

    pub fn is_empty(&self) -> bool {
        self.delta.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLISHED: &[&str] = &[
        "0.9.0", "1.0.0", "1.0.1", "1.0.2", "1.1.0", "1.2.0-beta.1", "1.2.0", "2.0.0-rc.1",
        "2.0.0", "2.1.0", "3.0.0",
    ];

    fn window(installed: &str, target: &str) -> VersionDelta {
        VersionWindow::between(Some(installed), Some(target), PUBLISHED.iter().copied()).delta
    }

    #[test]
    fn test_window_buckets_relative_to_installed() {
        let delta = window("1.0.0", "2.1.0");
        assert_eq!(delta.patch, 2);
        assert_eq!(delta.minor, 2);
        assert_eq!(delta.prerelease, 2);
        assert_eq!(delta.major, 2);
    }

    #[test]
    fn test_window_excludes_installed_version() {
        let delta = window("1.0.0", "1.0.1");
        assert_eq!(delta.total(), 1);
        assert_eq!(delta.patch, 1);
    }

    #[test]
    fn test_window_empty_for_equal_versions() {
        assert!(VersionWindow::between(Some("1.0.0"), Some("1.0.0"), PUBLISHED.iter().copied())
            .is_empty());
    }

    #[test]
    fn test_window_empty_when_target_older() {
        assert_eq!(window("2.0.0", "1.0.0"), VersionDelta::default());
    }

    #[test]
    fn test_window_empty_when_installed_unknown() {
        let w = VersionWindow::between(None, Some("2.0.0"), PUBLISHED.iter().copied());
        assert!(w.is_empty());
        let w = VersionWindow::between(Some("not-a-version"), Some("2.0.0"), PUBLISHED.iter().copied());
        assert!(w.is_empty());
    }

    #[test]
    fn test_window_ignores_unparseable_published_versions() {
        let published = ["1.0.0", "garbage", "1.0.1", "latest"];
        let w = VersionWindow::between(Some("1.0.0"), Some("1.0.1"), published.iter().copied());
        assert_eq!(w.delta.patch, 1);
        assert_eq!(w.delta.total(), 1);
    }

    #[test]
    fn test_window_installed_not_published() {
        // Installed version need not appear in the registry list
        let published = ["1.0.5", "1.1.0"];
        let w = VersionWindow::between(Some("1.0.3"), Some("1.1.0"), published.iter().copied());
        assert_eq!(w.delta.patch, 1);
        assert_eq!(w.delta.minor, 1);
    }

    #[test]
    fn test_window_serializes_delta() {
        let json = serde_json::to_value(VersionWindow::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"delta": {"major": 0, "minor": 0, "patch": 0, "prerelease": 0}})
        );
    }
}
