//! Suggestions read from a JSON file
//!
//! Accepts either the raw engine mapping or a wrapper object:
//!
//! ```json
//! { "upgrades": { "lodash": "^4.17.21" }, "resolved": { "lodash": "4.17.21" } }
//! ```
//!
//! Concrete targets are derived from each range; `resolved` only fills in
//! packages whose range names no concrete version.

use super::{SuggestionOutput, SuggestionRequest, SuggestionResult, SuggestionSource};
use crate::error::SuggestionError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Suggestion source backed by a pre-computed JSON file
#[derive(Debug, Clone)]
pub struct FileSuggestionSource {
    path: PathBuf,
}

impl FileSuggestionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse file content into suggestion output
    pub fn parse(content: &str, origin: &str) -> Result<SuggestionOutput, SuggestionError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| SuggestionError::JsonParseError {
                origin: origin.to_string(),
                message: e.to_string(),
            })?;

        if !is_wrapper(&value) {
            return Ok(SuggestionOutput::from_result(SuggestionResult::from_value(
                value,
            )?));
        }

        let Value::Object(mut wrapper) = value else {
            return Err(SuggestionError::invalid_shape("expected a JSON object"));
        };
        let upgrades = wrapper.remove("upgrades").unwrap_or(Value::Null);
        let mut output = SuggestionOutput::from_result(SuggestionResult::from_value(upgrades)?);

        if let Some(Value::Object(resolved)) = wrapper.remove("resolved") {
            output.resolved_by_name = resolved
                .into_iter()
                .filter_map(|(name, version)| match version {
                    Value::String(v) => Some((name, v)),
                    _ => None,
                })
                .collect();
        }
        Ok(output)
    }
}

/// `{upgrades: {...}}` optionally alongside `resolved`, and nothing else
fn is_wrapper(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("upgrades").is_some_and(Value::is_object)
        && obj.keys().all(|k| k == "upgrades" || k == "resolved")
        && obj.get("resolved").map_or(true, Value::is_object)
}

#[async_trait]
impl SuggestionSource for FileSuggestionSource {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionOutput, SuggestionError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|source| {
            SuggestionError::ReadError {
                path: self.path.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %self.path.display(), "read suggestions from file");
        let output = Self::parse(&content, &self.path.display().to_string())?;
        Ok(output.relative_to(&request.root))
    }
}
