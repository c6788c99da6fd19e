// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git commit records

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Format git uses for `--date=iso`
const ISO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// A commit as reported by `git log`
///
/// All fields are kept as git printed them; `date` is git's `--date=iso`
/// text, e.g. `2026-01-17 02:33:06 +1100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The full commit hash
    pub hash: String,
    /// Author name
    pub author: String,
    /// Author date in ISO-8601-like form
    pub date: String,
    /// Subject line of the commit message
    pub message: String,
}

impl CommitRecord {
    /// Validate that a hash is a 40-character hex string
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }

    /// Parse `date` into a timestamp
    ///
    /// Returns `None` if git printed the date in an unexpected format.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(&self.date, ISO_DATE_FORMAT).ok()
    }
}
