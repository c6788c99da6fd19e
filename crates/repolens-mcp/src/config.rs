// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the repolens-mcp server
//!
//! This module provides the command-line configuration for the MCP server,
//! including the git executable, timeout, default workspace, and logging
//! options.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use repolens_git::GitCli;
use serde_json::{Map, Value, json};

/// Repolens MCP Server - read-only git status and log for AI agents
#[derive(Parser, Debug, Clone)]
#[command(name = "repolens-mcp")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to MCP server mode)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Default repository path for tool calls
    ///
    /// Used when a `git_tool` call does not pass `repo_path`.
    #[arg(short, long, env = "REPOLENS_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// git executable to invoke
    #[arg(long, env = "REPOLENS_GIT", default_value = "git")]
    pub git: PathBuf,

    /// Timeout in seconds for each git invocation
    #[arg(long, env = "REPOLENS_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr to avoid interfering with MCP stdio
    /// transport.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
///
/// Each runs `git_tool` once and prints its JSON result to stdout.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print `git status --porcelain` lines for a repository
    Status {
        /// Repository path (defaults to --workspace)
        repo: Option<PathBuf>,
    },

    /// Print the most recent commits of a repository
    Log {
        /// Repository path (defaults to --workspace)
        repo: Option<PathBuf>,

        /// Number of commits to show
        #[arg(short, default_value_t = 5)]
        n: usize,
    },
}

impl Command {
    /// Translate this subcommand into `git_tool` arguments
    ///
    /// `repo_path` is left out when no repository was given, so the call
    /// falls back to the workspace.
    #[must_use]
    pub fn tool_args(&self) -> Map<String, Value> {
        let (action, repo, n) = match self {
            Self::Status { repo } => ("status", repo, None),
            Self::Log { repo, n } => ("log", repo, Some(*n)),
        };

        let mut args = Map::new();
        args.insert("action".into(), json!(action));
        if let Some(repo) = repo {
            args.insert("repo_path".into(), json!(repo.display().to_string()));
        }
        if let Some(n) = n {
            args.insert("n".into(), json!(n));
        }
        args
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            workspace: None,
            git: PathBuf::from("git"),
            timeout: 10,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Build the git runner described by this configuration
    #[must_use]
    pub fn git_cli(&self) -> GitCli {
        GitCli::new()
            .with_program(&self.git)
            .with_timeout(Duration::from_secs(self.timeout))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The workspace path is specified but doesn't exist or is not a directory
    /// - The timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref workspace) = self.workspace {
            if !workspace.exists() {
                return Err(ConfigError::WorkspaceNotFound(workspace.clone()));
            }
            if !workspace.is_dir() {
                return Err(ConfigError::WorkspaceNotDirectory(workspace.clone()));
            }
        }

        if self.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Workspace path not found
    #[error("Workspace path not found: {0}")]
    WorkspaceNotFound(PathBuf),

    /// Workspace path is not a directory
    #[error("Workspace path is not a directory: {0}")]
    WorkspaceNotDirectory(PathBuf),

    /// Timeout must be positive
    #[error("Timeout must be at least 1 second")]
    InvalidTimeout,
}
