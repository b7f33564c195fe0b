//! Suggestions from running npm-check-updates (or a compatible command)

use super::{SuggestionOutput, SuggestionRequest, SuggestionResult, SuggestionSource};
use crate::domain::{DepFilter, Scope};
use crate::error::SuggestionError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

/// Default engine invocation
pub const DEFAULT_NCU_COMMAND: &str = "npx --yes npm-check-updates";

/// Runs the suggestion engine as a child process in the project directory
#[derive(Debug, Clone)]
pub struct CommandSuggestionSource {
    command: String,
}

impl Default for CommandSuggestionSource {
    fn default() -> Self {
        Self::new(DEFAULT_NCU_COMMAND)
    }
}

impl CommandSuggestionSource {
    /// `command` is split on whitespace; the first word is the program
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Engine arguments for a request
    fn build_args(request: &SuggestionRequest) -> Vec<String> {
        let mut args = vec![
            "--jsonUpgraded".to_string(),
            "--target".to_string(),
            request.target.as_str().to_string(),
        ];
        match request.dep {
            DepFilter::Prod => args.extend(["--dep".to_string(), "prod".to_string()]),
            DepFilter::Dev => args.extend(["--dep".to_string(), "dev".to_string()]),
            DepFilter::All => {}
        }
        if request.scope == Scope::Workspaces {
            args.extend(["--workspaces".to_string(), "--root".to_string()]);
        }
        args
    }

    async fn execute(&self, request: &SuggestionRequest) -> Result<String, SuggestionError> {
        let mut words = self.command.split_whitespace();
        let Some(program) = words.next() else {
            return Err(SuggestionError::command_failed(
                &self.command,
                "empty command",
            ));
        };
        let args: Vec<String> = words
            .map(str::to_string)
            .chain(Self::build_args(request))
            .collect();

        tracing::debug!(program, ?args, root = %request.root.display(), "running suggestion engine");

        let output = Command::new(program)
            .args(&args)
            .current_dir(&request.root)
            .output()
            .await
            .map_err(|e| {
                SuggestionError::command_failed(&self.command, format!("failed to execute: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SuggestionError::command_failed(
                &self.command,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl SuggestionSource for CommandSuggestionSource {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionOutput, SuggestionError> {
        let stdout = self.execute(request).await?;
        let trimmed = stdout.trim();
        // Nothing to upgrade can come back as an empty stdout
        let value: Value = if trimmed.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(trimmed).map_err(|e| SuggestionError::JsonParseError {
                origin: self.command.clone(),
                message: e.to_string(),
            })?
        };

        let result = SuggestionResult::from_value(value)?.relative_to(&request.root);
        Ok(SuggestionOutput::from_result(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Target;
    use std::path::PathBuf;

    fn request(scope: Scope, dep: DepFilter) -> SuggestionRequest {
        SuggestionRequest {
            root: std::env::temp_dir(),
            scope,
            target: Target::Minor,
            dep,
        }
    }

    #[test]
    fn test_build_args_root_all() {
        let args = CommandSuggestionSource::build_args(&request(Scope::Root, DepFilter::All));
        assert_eq!(args, vec!["--jsonUpgraded", "--target", "minor"]);
    }

    #[test]
    fn test_build_args_workspaces_dev() {
        let args =
            CommandSuggestionSource::build_args(&request(Scope::Workspaces, DepFilter::Dev));
        assert_eq!(
            args,
            vec![
                "--jsonUpgraded",
                "--target",
                "minor",
                "--dep",
                "dev",
                "--workspaces",
                "--root"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let source = CommandSuggestionSource::new("depwhy-definitely-not-a-real-program");
        let err = source
            .suggest(&request(Scope::Root, DepFilter::All))
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestionError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_empty_command_fails() {
        let source = CommandSuggestionSource::new("   ");
        let err = source
            .suggest(&request(Scope::Root, DepFilter::All))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty command"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_script_and_normalizes_keys() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script: PathBuf = dir.path().join("fake-ncu.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\necho '{\"./package.json\": {\"lodash\": \"^4.17.21\"}, \"packages/a/package.json\": {\"vitest\": \"^1.6.0\"}}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let source = CommandSuggestionSource::new(script.display().to_string());
        let mut req = request(Scope::Workspaces, DepFilter::All);
        req.root = dir.path().to_path_buf();
        let output = source.suggest(&req).await.unwrap();

        match &output.result {
            Some(SuggestionResult::Workspaced(files)) => {
                assert!(files.contains_key("package.json"));
                assert!(files.contains_key("packages/a/package.json"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            output.resolved_target("packages/a/package.json", "vitest"),
            Some("1.6.0".to_string())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_fails() {
        let source = CommandSuggestionSource::new("false");
        let err = source
            .suggest(&request(Scope::Root, DepFilter::All))
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestionError::CommandFailed { .. }));
    }
}
