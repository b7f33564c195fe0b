//! Version windows over registry metadata

use crate::domain::VersionWindow;
use serde_json::Value;

/// Every version string published in a registry metadata document
pub fn published_versions(metadata: &Value) -> Vec<&str> {
    metadata
        .get("versions")
        .and_then(Value::as_object)
        .map(|versions| versions.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Window between installed and target over the versions in `metadata`
pub fn version_window(
    metadata: &Value,
    installed: Option<&str>,
    target: Option<&str>,
) -> VersionWindow {
    VersionWindow::between(installed, target, published_versions(metadata))
}
