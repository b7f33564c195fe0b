//! Lockfile version indexes
//!
//! This module provides:
//! - One index per lockfile format (npm, pnpm, yarn classic/berry, bun)
//! - A uniform `InstalledVersionLookup` interface over all of them
//! - Lockfile selection by probing the project root
//!
//! Parse failures never escape this module: a lockfile that cannot be read
//! or understood yields a lookup that knows no versions.

mod bun;
mod npm;
mod pnpm;
mod selector;
mod yarn;

pub use bun::BunLockfileIndex;
pub use npm::NpmLockfileIndex;
pub use pnpm::{importer_key, PnpmLockfileIndex};
pub use selector::{select_lookup, LockfileFormat};
pub use yarn::{split_descriptors, YarnLockfileIndex};

/// Resolves the installed version of a package declared in a manifest
pub trait InstalledVersionLookup: Send + Sync {
    /// Installed version of `package_name` as declared in `package_file`
    /// with `current_range`, or `None` when unknown
    fn installed_version(
        &self,
        package_file: &str,
        package_name: &str,
        current_range: &str,
    ) -> Option<String>;
}

/// Lookup used when no lockfile exists or it could not be parsed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLockfile;

impl InstalledVersionLookup for NoLockfile {
    fn installed_version(&self, _: &str, _: &str, _: &str) -> Option<String> {
        None
    }
}

/// Strip a parenthesized peer-dependency annotation, e.g.
/// `4.17.21(esbuild@0.18.0)` -> `4.17.21`
pub fn normalize_installed_version(version: &str) -> String {
    let version = match version.find('(') {
        Some(idx) => &version[..idx],
        None => version,
    };
    version.trim().to_string()
}
