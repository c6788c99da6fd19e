// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Running the git executable
//!
//! This module provides [`GitCli`], which invokes an installed `git` binary
//! against a repository path with a fixed timeout and hands its output to
//! the parsers.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::commit::CommitRecord;
use crate::error::GitError;
use crate::parser::{LOG_FORMAT, parse_log_output, parse_status_output};

/// Default timeout for a single git invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A handle on the git command-line executable
///
/// Cheap to clone; holds no state besides the program path and timeout, so
/// concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH` with the default timeout
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the executable to invoke
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the per-invocation timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The executable that will be invoked
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The per-invocation timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `git status --porcelain` and return its lines
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git cannot be run, times out, or exits non-zero.
    pub async fn status(&self, repo: impl AsRef<Path>) -> Result<Vec<String>, GitError> {
        let output = self.run(repo.as_ref(), &["status", "--porcelain"]).await?;
        Ok(parse_status_output(&output))
    }

    /// Return the `n` most recent commits, newest first
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git cannot be run, times out, or exits non-zero
    /// (which includes a repository with no commits yet).
    pub async fn log(
        &self,
        repo: impl AsRef<Path>,
        n: usize,
    ) -> Result<Vec<CommitRecord>, GitError> {
        let limit = format!("-n{n}");
        let pretty = format!("--pretty=format:{LOG_FORMAT}");
        let output = self
            .run(repo.as_ref(), &["log", &limit, &pretty, "--date=iso"])
            .await?;
        Ok(parse_log_output(&output))
    }

    /// Run `git -C <repo> <args...>` and return stdout
    ///
    /// On success, anything git wrote to stderr is logged as a warning.
    /// On a non-zero exit the error carries stdout followed by stderr.
    ///
    /// # Errors
    ///
    /// See [`GitCli::run_captured`].
    pub async fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        let output = self.run_captured(repo, args).await?;
        if !output.stderr.trim().is_empty() {
            warn!(
                command = args.first().copied().unwrap_or_default(),
                repo = %repo.display(),
                stderr = %output.stderr.trim_end(),
                "git reported warnings"
            );
        }
        Ok(output.stdout)
    }

    /// Run `git -C <repo> <args...>` and return both output streams
    ///
    /// # Errors
    ///
    /// Returns `GitError::EmptyRepositoryPath` if `repo` is empty,
    /// `GitError::RepositoryNotFound` if `repo` is not a directory,
    /// `GitError::Spawn` if the executable cannot be started,
    /// `GitError::Timeout` if it runs past the timeout, and
    /// `GitError::ProcessFailed` on a non-zero exit.
    pub async fn run_captured(&self, repo: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
        if repo.as_os_str().is_empty() {
            return Err(GitError::EmptyRepositoryPath);
        }
        if !repo.is_dir() {
            return Err(GitError::RepositoryNotFound {
                path: repo.display().to_string(),
            });
        }

        let subcommand = args.first().copied().unwrap_or_default();
        debug!(
            program = %self.program.display(),
            repo = %repo.display(),
            args = ?args,
            "Running git"
        );

        let start = Instant::now();
        let child = Command::new(&self.program)
            .arg("-C")
            .arg(repo)
            .args(args)
            // Keep status from refreshing the index
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GitError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    command = subcommand,
                    timeout_ms = self.timeout.as_millis(),
                    "git timed out"
                );
                return Err(GitError::Timeout {
                    command: subcommand.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(
            command = subcommand,
            exit_code = output.status.code().unwrap_or(-1),
            duration_ms = start.elapsed().as_millis(),
            "git completed"
        );

        if output.status.success() {
            Ok(GitOutput { stdout, stderr })
        } else {
            let mut combined = stdout;
            combined.push_str(&stderr);
            Err(GitError::ProcessFailed {
                code: output.status.code(),
                output: combined,
            })
        }
    }
}

/// Output of a git invocation that exited successfully
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Standard output, decoded lossily
    pub stdout: String,
    /// Standard error, usually empty or warnings
    pub stderr: String,
}
