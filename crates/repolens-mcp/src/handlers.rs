// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Tool handlers for the MCP server
//!
//! This module implements the `git_tool` dispatcher, bridging MCP requests
//! to git invocations and returning serializable results. Git failures are
//! reported inside [`ToolOutput`]; only malformed requests and unsupported
//! actions become a [`HandlerError`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use repolens_git::{CommitRecord, ErrorKind, GitCli, GitError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// Error Types
// ============================================================================

/// Handler errors
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The requested action is not `status` or `log`
    #[error("Unsupported git action. Use 'status' or 'log'.")]
    UnsupportedAction(String),

    /// Invalid input - missing or malformed field
    #[error("Invalid input: {0}. Check the tool's required parameters.")]
    InvalidInput(String),

    /// JSON serialization error
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Input Types
// ============================================================================

/// Actions supported by `git_tool`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitAction {
    /// `git status --porcelain`
    Status,
    /// Recent commit log
    Log,
}

impl FromStr for GitAction {
    type Err = HandlerError;

    /// Parse an action name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "log" => Ok(Self::Log),
            _ => Err(HandlerError::UnsupportedAction(s.to_string())),
        }
    }
}

/// Input for the git_tool
#[derive(Debug, Clone, Deserialize)]
pub struct GitToolInput {
    /// `status` or `log`, case-insensitive
    pub action: String,
    /// Path to a local repository (falls back to the server workspace)
    pub repo_path: Option<String>,
    /// Number of commits for `log`; whole-number floats such as `5.0` are accepted
    #[serde(default, deserialize_with = "deserialize_whole_number")]
    pub n: Option<i64>,
}

/// Accept an integer, or a float with no fractional part
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(serde::de::Error::custom(format!(
            "n must be a whole number, got {number}"
        ))),
    }
}

/// Default number of commits returned by `log`
pub const DEFAULT_LOG_COUNT: usize = 5;

impl GitToolInput {
    /// Number of commits requested, defaulting to [`DEFAULT_LOG_COUNT`]
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::InvalidInput` if `n` is negative.
    pub fn count(&self) -> Result<usize, HandlerError> {
        match self.n {
            None => Ok(DEFAULT_LOG_COUNT),
            Some(n) => usize::try_from(n).map_err(|_| {
                HandlerError::InvalidInput(format!("n must be zero or greater, got {n}"))
            }),
        }
    }

    /// Resolve the repository path against a default workspace
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::InvalidInput` if neither is available.
    pub fn resolve_repo(
        &self,
        default_workspace: Option<&PathBuf>,
    ) -> Result<PathBuf, HandlerError> {
        self.repo_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| default_workspace.cloned())
            .ok_or_else(|| {
                HandlerError::InvalidInput(
                    "repo_path is required when the server has no default workspace".to_string(),
                )
            })
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// Result of a `git_tool` call
///
/// Serializes to one of `{status_lines}`, `{commits}` or
/// `{error, error_kind}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// Porcelain status lines, in git's order
    Status {
        /// Raw status lines
        status_lines: Vec<String>,
    },
    /// Recent commits, newest first
    Log {
        /// Commit records
        commits: Vec<CommitRecord>,
    },
    /// git could not produce a result
    Failure {
        /// Error message or captured git output
        error: String,
        /// Error classification
        error_kind: ErrorKind,
    },
}

impl From<GitError> for ToolOutput {
    fn from(err: GitError) -> Self {
        Self::Failure {
            error_kind: err.kind(),
            error: err.to_string(),
        }
    }
}

impl ToolOutput {
    /// Whether this output reports a failure
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

/// Parse input from MCP arguments into a typed struct
fn parse_input<T: for<'de> Deserialize<'de>>(
    args: Option<Map<String, Value>>,
) -> Result<T, HandlerError> {
    let value = args
        .map(Value::Object)
        .unwrap_or(Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| HandlerError::InvalidInput(e.to_string()))
}

/// Run the status operation, absorbing git failures into the output
pub async fn git_status(git: &GitCli, repo_path: &Path) -> ToolOutput {
    match git.status(repo_path).await {
        Ok(status_lines) => ToolOutput::Status { status_lines },
        Err(err) => {
            warn!(repo = %repo_path.display(), kind = ?err.kind(), error = %err, "git status failed");
            err.into()
        }
    }
}

/// Run the log operation, absorbing git failures into the output
pub async fn git_log_recent(git: &GitCli, repo_path: &Path, n: usize) -> ToolOutput {
    match git.log(repo_path, n).await {
        Ok(commits) => ToolOutput::Log { commits },
        Err(err) => {
            warn!(repo = %repo_path.display(), kind = ?err.kind(), error = %err, "git log failed");
            err.into()
        }
    }
}

/// Handle the git_tool
///
/// The action is checked before anything else, so an unsupported action
/// fails regardless of the other arguments.
pub async fn handle_git_tool(
    git: &GitCli,
    args: Option<Map<String, Value>>,
    default_workspace: Option<&PathBuf>,
) -> Result<ToolOutput, HandlerError> {
    let input: GitToolInput = parse_input(args)?;
    let action: GitAction = input.action.parse()?;
    let repo_path = input.resolve_repo(default_workspace)?;

    debug!(action = ?action, repo = %repo_path.display(), n = ?input.n, "git_tool call");

    let output = match action {
        GitAction::Status => git_status(git, &repo_path).await,
        GitAction::Log => git_log_recent(git, &repo_path, input.count()?).await,
    };

    Ok(output)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper to convert a JSON Value to a Map for testing
    fn to_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected JSON object"),
        }
    }

    #[test]
    fn test_action_parsing_is_case_insensitive() {
        assert_eq!("status".parse::<GitAction>().unwrap(), GitAction::Status);
        assert_eq!("STATUS".parse::<GitAction>().unwrap(), GitAction::Status);
        assert_eq!("Log".parse::<GitAction>().unwrap(), GitAction::Log);
    }

    #[test]
    fn test_action_parsing_rejects_unknown() {
        let err = "delete".parse::<GitAction>().unwrap_err();
        assert!(matches!(err, HandlerError::UnsupportedAction(ref a) if a == "delete"));
        assert_eq!(
            err.to_string(),
            "Unsupported git action. Use 'status' or 'log'."
        );
    }

    #[test]
    fn test_parse_input_defaults() {
        let args = to_map(json!({ "action": "log", "repo_path": "/repo" }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        assert_eq!(input.action, "log");
        assert_eq!(input.repo_path, Some("/repo".to_string()));
        assert_eq!(input.count().unwrap(), 5);
    }

    #[test]
    fn test_parse_input_missing_action() {
        let result: Result<GitToolInput, _> = parse_input(None);
        assert!(matches!(result, Err(HandlerError::InvalidInput(_))));
    }

    #[test]
    fn test_count_rejects_negative() {
        let args = to_map(json!({ "action": "log", "n": -1 }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        assert!(matches!(input.count(), Err(HandlerError::InvalidInput(_))));
    }

    #[test]
    fn test_count_accepts_whole_float() {
        let args = to_map(json!({ "action": "log", "n": 5.0 }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        assert_eq!(input.n, Some(5));
        assert_eq!(input.count().unwrap(), 5);
    }

    #[test]
    fn test_count_rejects_fractional_float() {
        let args = to_map(json!({ "action": "log", "n": 2.5 }));
        let result: Result<GitToolInput, _> = parse_input(Some(args));
        match result {
            Err(HandlerError::InvalidInput(msg)) => assert!(msg.contains("whole number")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_count_negative_float_still_rejected() {
        let args = to_map(json!({ "action": "log", "n": -1.0 }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        assert!(matches!(input.count(), Err(HandlerError::InvalidInput(_))));
    }

    #[test]
    fn test_null_n_uses_default() {
        let args = to_map(json!({ "action": "log", "n": null }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        assert_eq!(input.count().unwrap(), DEFAULT_LOG_COUNT);
    }

    #[test]
    fn test_resolve_repo_prefers_explicit_path() {
        let args = to_map(json!({ "action": "status", "repo_path": "/explicit" }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        let default = PathBuf::from("/default");
        assert_eq!(
            input.resolve_repo(Some(&default)).unwrap(),
            PathBuf::from("/explicit")
        );
    }

    #[test]
    fn test_resolve_repo_falls_back_to_workspace() {
        let args = to_map(json!({ "action": "status" }));
        let input: GitToolInput = parse_input(Some(args)).expect("parse");
        let default = PathBuf::from("/default");
        assert_eq!(input.resolve_repo(Some(&default)).unwrap(), default);
        assert!(matches!(
            input.resolve_repo(None),
            Err(HandlerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tool_output_shapes() {
        let status = ToolOutput::Status {
            status_lines: vec![" M a.txt".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({ "status_lines": [" M a.txt"] })
        );

        let failure: ToolOutput = GitError::ProcessFailed {
            code: Some(128),
            output: "fatal: not a git repository".to_string(),
        }
        .into();
        assert!(failure.is_failure());
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "error": "fatal: not a git repository", "error_kind": "process" })
        );
    }

    #[tokio::test]
    async fn test_handle_unsupported_action_before_anything_else() {
        let git = GitCli::new();
        let args = to_map(json!({ "action": "delete", "n": -3 }));
        let result = handle_git_tool(&git, Some(args), None).await;
        assert!(matches!(result, Err(HandlerError::UnsupportedAction(_))));
    }

    #[tokio::test]
    async fn test_handle_status_nonexistent_path_is_data() {
        let git = GitCli::new();
        let args = to_map(json!({ "action": "status", "repo_path": "/nonexistent/path/12345" }));
        let output = handle_git_tool(&git, Some(args), None).await.expect("handle");
        match output {
            ToolOutput::Failure { error, error_kind } => {
                assert!(!error.is_empty());
                assert_eq!(error_kind, ErrorKind::Execution);
            }
            other => panic!("Expected failure output, got {other:?}"),
        }
    }
}
