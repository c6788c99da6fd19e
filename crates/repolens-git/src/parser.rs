// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Parsers for git's plain-text output
//!
//! Only the two fixed formats repolens asks for are understood:
//! `git status --porcelain` and `git log` with [`LOG_FORMAT`].

use crate::commit::CommitRecord;

/// Delimiter between fields of a log line (ASCII unit separator)
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// `--pretty=format:` string producing hash, author, date and subject
pub const LOG_FORMAT: &str = "%H%x1f%an%x1f%ad%x1f%s";

/// Split porcelain status output into its lines
///
/// Lines keep their leading status columns, so ` M src/lib.rs` stays intact.
#[must_use]
pub fn parse_status_output(output: &str) -> Vec<String> {
    output.lines().map(str::to_string).collect()
}

/// Parse a single log line into a commit record
///
/// Returns `None` when the line has fewer than four fields.
#[must_use]
pub fn parse_log_line(line: &str) -> Option<CommitRecord> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let hash = fields.next()?;
    let author = fields.next()?;
    let date = fields.next()?;
    let message = fields.next()?;

    Some(CommitRecord {
        hash: hash.to_string(),
        author: author.to_string(),
        date: date.to_string(),
        message: message.to_string(),
    })
}

/// Parse `git log` output produced with [`LOG_FORMAT`]
///
/// Malformed lines are skipped; order is preserved (most recent first).
#[must_use]
pub fn parse_log_output(output: &str) -> Vec<CommitRecord> {
    output.lines().filter_map(parse_log_line).collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for a single field: no separator, no line breaks
    fn field_strategy() -> impl Strategy<Value = String> {
        "[^\u{1f}\r\n]{0,40}"
    }

    proptest! {
        /// Property: a well-formed line yields back its four fields
        #[test]
        fn prop_well_formed_line_roundtrips(
            hash in "[0-9a-f]{40}",
            author in field_strategy(),
            date in field_strategy(),
            message in field_strategy(),
        ) {
            let sep = FIELD_SEPARATOR.to_string();
            let line = [hash.as_str(), &author, &date, &message].join(&sep);
            let commit = parse_log_line(&line).expect("four fields");
            prop_assert_eq!(commit.hash, hash);
            prop_assert_eq!(commit.author, author);
            prop_assert_eq!(commit.date, date);
            prop_assert_eq!(commit.message, message);
        }

        /// Property: lines with fewer than four fields never produce records
        #[test]
        fn prop_short_lines_are_dropped(
            fields in proptest::collection::vec(field_strategy(), 1..4),
        ) {
            let line = fields.join(&FIELD_SEPARATOR.to_string());
            prop_assert!(parse_log_output(&line).is_empty());
        }

        /// Property: never more records than input lines
        #[test]
        fn prop_record_count_bounded_by_lines(output in "(?s).{0,400}") {
            let commits = parse_log_output(&output);
            prop_assert!(commits.len() <= output.lines().count());
        }

        /// Property: status lines are the input lines, unchanged
        #[test]
        fn prop_status_lines_match_input(output in "(?s).{0,400}") {
            let lines = parse_status_output(&output);
            prop_assert_eq!(lines.len(), output.lines().count());
        }
    }
}
