// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for repolens-git

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while running git
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process did not finish within the configured timeout
    #[error("git {command} timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// The git subcommand that was running
        command: String,
        /// The timeout that expired
        timeout: Duration,
    },

    /// git exited with a non-zero status
    ///
    /// `output` holds stdout followed by stderr, as git printed them.
    #[error("{output}")]
    ProcessFailed {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Combined process output
        output: String,
    },

    /// The git executable could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// The program that was invoked
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Repository path does not exist or is not a directory
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was requested
        path: String,
    },

    /// Repository path is the empty string
    #[error("Empty repository path")]
    EmptyRepositoryPath,

    /// I/O error while waiting on the process
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`GitError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The process ran past its timeout
    Timeout,
    /// The process ran and exited with a failure status
    Process,
    /// The process could not be run at all
    Execution,
}

impl GitError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ProcessFailed { .. } => ErrorKind::Process,
            Self::Spawn { .. }
            | Self::RepositoryNotFound { .. }
            | Self::EmptyRepositoryPath
            | Self::Io(_) => ErrorKind::Execution,
        }
    }
}
