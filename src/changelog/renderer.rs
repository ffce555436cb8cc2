//! Renders new commits into a changes-file entry.

use crate::domain::{short_hash, CommitRecord};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Width of the dashed line opening every changes entry.
pub const SEPARATOR_WIDTH: usize = 67;

/// ctime-like layout used by changes files, e.g. `Wed Jan  1 00:00:00 UTC 2020`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// Builds changes-file entries from new upstream commits
pub struct ChangeEntryRenderer;

impl ChangeEntryRenderer {
    /// Render the entry for `new_changes` (newest first).
    ///
    /// Returns `None` when there is nothing new.
    pub fn render(
        new_changes: &[CommitRecord],
        package_version: &str,
        author_email: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<String> {
        if new_changes.is_empty() {
            return None;
        }

        let mut entry = String::new();
        entry.push_str(&"-".repeat(SEPARATOR_WIDTH));
        entry.push('\n');
        entry.push_str(&format!(
            "{} - {}\n",
            Self::format_timestamp(timestamp),
            author_email
        ));
        entry.push('\n');
        entry.push_str(&format!("- Update to version {}:\n", package_version));
        for message in Self::collect_messages(new_changes) {
            entry.push_str(&format!("  + {}\n", message));
        }
        entry.push('\n');

        Some(entry)
    }

    /// Messages to list for `new_changes`, oldest first.
    ///
    /// A merge contributes its quoted summary and hides the merged commit's
    /// own record, so each change is listed once.
    pub fn collect_messages(new_changes: &[CommitRecord]) -> Vec<String> {
        let mut merged: HashSet<String> = HashSet::new();
        let mut messages = Vec::new();

        for record in new_changes {
            match &record.merge_commit {
                Some(merge_commit) => {
                    let summary = record.merge_summary().unwrap_or(record.message.as_str());
                    messages.push(summary.to_string());
                    merged.insert(short_hash(merge_commit).to_string());
                }
                None if merged.contains(record.short_hash()) => {}
                None => messages.push(record.message.clone()),
            }
        }

        messages.reverse();
        messages
    }

    pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
        timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch_2020() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn plain(hash: &str, message: &str) -> CommitRecord {
        CommitRecord::new(hash, "A <a@example.com>", "D", message)
    }

    #[test]
    fn test_render_empty_is_none() {
        assert_eq!(
            ChangeEntryRenderer::render(&[], "1.0", "me@example.com", epoch_2020()),
            None
        );
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(
            ChangeEntryRenderer::format_timestamp(epoch_2020()),
            "Wed Jan  1 00:00:00 UTC 2020"
        );
        let later = Utc.with_ymd_and_hms(2021, 11, 23, 14, 5, 9).unwrap();
        assert_eq!(
            ChangeEntryRenderer::format_timestamp(later),
            "Tue Nov 23 14:05:09 UTC 2021"
        );
    }

    #[test]
    fn test_render_layout() {
        let changes = vec![plain("c3c3c3c3", "Third"), plain("c2c2c2c2", "Second")];
        let entry = ChangeEntryRenderer::render(
            &changes,
            "2.3.1+git.1577836800.c3c3c3c",
            "me@example.com",
            epoch_2020(),
        )
        .unwrap();

        let expected = format!(
            "{}\nWed Jan  1 00:00:00 UTC 2020 - me@example.com\n\n\
             - Update to version 2.3.1+git.1577836800.c3c3c3c:\n  + Second\n  + Third\n\n",
            "-".repeat(67)
        );
        assert_eq!(entry, expected);
    }

    #[test]
    fn test_messages_are_oldest_first() {
        let changes = vec![plain("3333333", "m1"), plain("2222222", "m2"), plain("1111111", "m3")];
        assert_eq!(
            ChangeEntryRenderer::collect_messages(&changes),
            vec!["m3", "m2", "m1"]
        );
    }

    #[test]
    fn test_merge_hides_merged_commit() {
        let changes = vec![
            plain("9999999999", "Merge \"Fix bug X\"").with_merge("abc1234"),
            plain("abc1234abc1234", "Fix bug X in the parser"),
            plain("5555555555", "Unrelated change"),
        ];
        let entry =
            ChangeEntryRenderer::render(&changes, "1.0", "me@example.com", epoch_2020()).unwrap();

        assert_eq!(entry.matches("Fix bug X").count(), 1);
        assert!(!entry.contains("Fix bug X in the parser"));
        assert!(entry.contains("  + Unrelated change\n  + Fix bug X\n"));
    }

    #[test]
    fn test_merge_with_full_second_parent() {
        let changes = vec![
            plain("9999999999", "Merge \"Add feature\"").with_merge("abc1234abc1234abc1234"),
            plain("abc1234abc1234abc1234", "Add feature"),
        ];
        assert_eq!(
            ChangeEntryRenderer::collect_messages(&changes),
            vec!["Add feature"]
        );
    }

    #[test]
    fn test_unquoted_merge_keeps_raw_message() {
        let changes = vec![plain("9999999999", "Merge branch 'stable'").with_merge("abc1234")];
        assert_eq!(
            ChangeEntryRenderer::collect_messages(&changes),
            vec!["Merge branch 'stable'"]
        );
    }

    #[test]
    fn test_merged_commit_listed_before_its_merge_is_kept() {
        // The merged set only hides commits older than the merge.
        let changes = vec![
            plain("abc1234abc1234", "Fix bug X"),
            plain("9999999999", "Merge \"Fix bug X\"").with_merge("abc1234"),
        ];
        assert_eq!(
            ChangeEntryRenderer::collect_messages(&changes),
            vec!["Fix bug X", "Fix bug X"]
        );
    }
}
