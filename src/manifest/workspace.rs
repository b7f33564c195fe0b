//! Workspace detection and scope resolution

use super::PackageJson;
use crate::domain::Scope;
use std::path::Path;

/// Check if a directory has pnpm workspace configuration
pub fn has_pnpm_workspace(dir: &Path) -> bool {
    dir.join("pnpm-workspace.yaml").is_file()
}

/// Resolve the requested scope into the effective one.
///
/// `Auto` becomes `Workspaces` when the root manifest declares workspaces or
/// a pnpm-workspace.yaml exists, and `Root` otherwise. Explicit scopes are
/// kept as requested.
pub fn resolve_scope(requested: Scope, root_dir: &Path, root_manifest: &PackageJson) -> Scope {
    match requested {
        Scope::Auto => {
            if root_manifest.declares_workspaces() || has_pnpm_workspace(root_dir) {
                Scope::Workspaces
            } else {
                Scope::Root
            }
        }
        explicit => explicit,
    }
}
