//! Manifest (package.json) reading and scope resolution
//!
//! This module provides:
//! - Reading and validating package.json files
//! - Looking up where a package is declared
//! - Workspace detection (package.json `workspaces`, pnpm-workspace.yaml)

mod package_json;
mod workspace;

pub use package_json::PackageJson;
pub use workspace::{has_pnpm_workspace, resolve_scope};

/// File name of a Node.js manifest
pub const MANIFEST_FILENAME: &str = "package.json";
