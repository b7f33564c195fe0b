//! Lockfile selection
//!
//! Probes the project root for lockfiles in a fixed priority order
//! (pnpm, npm, yarn, bun) and builds the matching index. The first existing
//! file wins.

use super::{
    BunLockfileIndex, InstalledVersionLookup, NoLockfile, NpmLockfileIndex, PnpmLockfileIndex,
    YarnLockfileIndex,
};
use crate::error::LockfileError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supported lockfile formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileFormat {
    Pnpm,
    Npm,
    Yarn,
    Bun,
}

impl LockfileFormat {
    /// Formats in probe priority order
    pub fn all() -> &'static [LockfileFormat] {
        &[
            LockfileFormat::Pnpm,
            LockfileFormat::Npm,
            LockfileFormat::Yarn,
            LockfileFormat::Bun,
        ]
    }

    /// Lockfile names for this format, in probe order
    pub fn file_names(&self) -> &'static [&'static str] {
        match self {
            LockfileFormat::Pnpm => &["pnpm-lock.yaml"],
            LockfileFormat::Npm => &["package-lock.json"],
            LockfileFormat::Yarn => &["yarn.lock"],
            LockfileFormat::Bun => &["bun.lock", "bun.lockb"],
        }
    }

    /// Parse lockfile content into a lookup
    pub fn parse(
        &self,
        content: &str,
        path: &Path,
    ) -> Result<Box<dyn InstalledVersionLookup>, LockfileError> {
        Ok(match self {
            LockfileFormat::Pnpm => Box::new(PnpmLockfileIndex::parse(content, path)?),
            LockfileFormat::Npm => Box::new(NpmLockfileIndex::parse(content, path)?),
            LockfileFormat::Yarn => Box::new(YarnLockfileIndex::parse(content, path)?),
            LockfileFormat::Bun => Box::new(BunLockfileIndex::parse(content, path)?),
        })
    }

    /// Find the first lockfile present in `root`
    pub fn detect(root: &Path) -> Option<(LockfileFormat, PathBuf)> {
        Self::all().iter().find_map(|format| {
            format
                .file_names()
                .iter()
                .map(|name| root.join(name))
                .find(|path| path.is_file())
                .map(|path| (*format, path))
        })
    }

    /// Read and parse the lockfile at `path`
    pub fn load(&self, path: &Path) -> Result<Box<dyn InstalledVersionLookup>, LockfileError> {
        let content = std::fs::read_to_string(path).map_err(|e| LockfileError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse(&content, path)
    }
}

/// Build the installed-version lookup for the project at `root`.
///
/// Falls back to a lookup that knows no versions when no lockfile exists or
/// the one found cannot be parsed.
pub fn select_lookup(root: &Path) -> Box<dyn InstalledVersionLookup> {
    let Some((format, path)) = LockfileFormat::detect(root) else {
        debug!("no lockfile found in {}", root.display());
        return Box::new(NoLockfile);
    };

    debug!("using {:?} lockfile {}", format, path.display());
    match format.load(&path) {
        Ok(lookup) => lookup,
        Err(e) => {
            warn!("ignoring lockfile: {}", e);
            Box::new(NoLockfile)
        }
    }
}
