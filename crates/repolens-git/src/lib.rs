// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! repolens-git: Read-only git access for repolens
//!
//! This library crate runs the installed `git` executable against a local
//! repository and parses its plain-text output into structured records for
//! the repolens MCP server.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use repolens_git::GitCli;
//!
//! # async fn run() -> Result<(), repolens_git::GitError> {
//! let git = GitCli::new();
//! for commit in git.log(".", 10).await? {
//!     println!("{} - {}", commit.short_hash(), commit.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod commit;
pub mod error;
pub mod parser;

pub use command::{DEFAULT_TIMEOUT, GitCli, GitOutput};
pub use commit::CommitRecord;
pub use error::{ErrorKind, GitError};
pub use parser::{FIELD_SEPARATOR, LOG_FORMAT, parse_log_output, parse_status_output};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::command::GitCli;
    pub use crate::commit::CommitRecord;
    pub use crate::error::{ErrorKind, GitError};
}
