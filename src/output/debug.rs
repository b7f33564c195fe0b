//! Debug dumps of intermediate pipeline stages

use crate::error::OutputError;
use serde::Serialize;
use std::path::PathBuf;

/// Writes pretty JSON snapshots under a directory, or does nothing
#[derive(Debug, Clone, Default)]
pub struct DebugDumper {
    dir: Option<PathBuf>,
}

impl DebugDumper {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// A dumper that never writes
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Write `value` to `<dir>/<name>`, creating the directory on demand
    pub fn dump<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), OutputError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };

        std::fs::create_dir_all(dir).map_err(|e| OutputError::write_error(dir, e))?;
        let path = dir.join(name);
        let mut json = serde_json::to_string_pretty(value).map_err(|e| {
            OutputError::SerializeError {
                what: name.to_string(),
                message: e.to_string(),
            }
        })?;
        json.push('\n');
        std::fs::write(&path, json).map_err(|e| OutputError::write_error(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote debug dump");
        Ok(())
    }
}
