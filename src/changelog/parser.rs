//! ChangeLog text parser
//!
//! Turns the `git log`-style ChangeLog shipped in upstream tarballs into
//! [`CommitRecord`]s, newest first:
//!
//! ```text
//! commit 3f2a...
//! Merge: 1a2b3c4 abc1234
//! Author: Jane Doe <jane@example.com>
//! Date:   Wed Jan 1 00:00:00 2020 +0000
//!
//!     Merge "Fix bug X"
//! ```

use crate::domain::CommitRecord;
use crate::error::{ChangesRefreshError, Result};
use regex::Regex;

/// A commit block that started with a `commit` line but lacked the
/// author, date or message needed to build a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFragment {
    pub commit: String,
    /// 1-based line number of the `commit` line
    pub line: usize,
    pub reason: String,
}

/// Full result of parsing a ChangeLog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedChangelog {
    pub records: Vec<CommitRecord>,
    pub skipped: Vec<SkippedFragment>,
}

/// Parser for ChangeLog text
pub struct ChangelogRecordParser;

struct Patterns {
    commit: Regex,
    merge: Regex,
    author: Regex,
    date: Regex,
}

impl Patterns {
    fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                ChangesRefreshError::parse(format!("invalid pattern '{}': {}", pattern, e))
            })
        };

        Ok(Patterns {
            commit: compile(r"^commit\s+([0-9a-fA-F]+)\b")?,
            merge: compile(r"^Merge:\s+(\S+)\s+(\S+)")?,
            author: compile(r"^Author:\s*(.*?)\s*$")?,
            date: compile(r"^Date:\s*(.*?)\s*$")?,
        })
    }
}

impl ChangelogRecordParser {
    /// Parse ChangeLog text into commit records, newest first.
    ///
    /// Malformed blocks are dropped; use [`Self::parse_report`] to find out
    /// which ones.
    ///
    /// # Errors
    /// Fails with [`ChangesRefreshError::Parse`] when the text contains no
    /// `commit <hash>` line at all.
    pub fn parse(text: &str) -> Result<Vec<CommitRecord>> {
        Ok(Self::parse_report(text)?.records)
    }

    /// Parse ChangeLog text, reporting skipped fragments alongside the records.
    pub fn parse_report(text: &str) -> Result<ParsedChangelog> {
        let patterns = Patterns::new()?;
        let lines: Vec<&str> = text.lines().collect();

        // (line index, hash) of every block start
        let starts: Vec<(usize, String)> = lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                patterns
                    .commit
                    .captures(line)
                    .and_then(|c| c.get(1))
                    .map(|m| (idx, m.as_str().to_string()))
            })
            .collect();

        if starts.is_empty() {
            return Err(ChangesRefreshError::parse(
                "no commit identifier found in changelog",
            ));
        }

        let mut parsed = ParsedChangelog::default();

        for (n, (start, hash)) in starts.iter().enumerate() {
            let end = starts.get(n + 1).map(|(idx, _)| *idx).unwrap_or(lines.len());
            let body = &lines[start + 1..end];

            match Self::parse_block(&patterns, hash, body) {
                Ok(record) => parsed.records.push(record),
                Err(reason) => parsed.skipped.push(SkippedFragment {
                    commit: hash.clone(),
                    line: start + 1,
                    reason,
                }),
            }
        }

        Ok(parsed)
    }

    /// Parse the lines following a `commit` line.
    ///
    /// Headers run until the first blank line; the message is the first
    /// indented paragraph after them.
    fn parse_block(
        patterns: &Patterns,
        hash: &str,
        body: &[&str],
    ) -> std::result::Result<CommitRecord, String> {
        let mut merge_commit = None;
        let mut author = None;
        let mut date = None;

        let mut idx = 0;
        if let Some(captures) = body.first().and_then(|line| patterns.merge.captures(line)) {
            merge_commit = captures.get(2).map(|m| m.as_str().to_string());
            idx = 1;
        }

        while idx < body.len() && !body[idx].trim().is_empty() {
            let line = body[idx];
            if let Some(captures) = patterns.author.captures(line) {
                author = captures.get(1).map(|m| m.as_str().to_string());
            } else if let Some(captures) = patterns.date.captures(line) {
                date = captures.get(1).map(|m| m.as_str().to_string());
            }
            idx += 1;
        }

        let author = author.ok_or_else(|| "missing Author line".to_string())?;
        let date = date.ok_or_else(|| "missing Date line".to_string())?;

        while idx < body.len() && body[idx].trim().is_empty() {
            idx += 1;
        }

        let message_lines: Vec<&str> = body[idx..]
            .iter()
            .take_while(|line| !line.trim().is_empty() && line.starts_with(char::is_whitespace))
            .map(|line| line.trim())
            .collect();

        if message_lines.is_empty() {
            return Err("missing message block".to_string());
        }

        Ok(CommitRecord {
            commit: hash.to_string(),
            merge_commit,
            author,
            date,
            message: message_lines.join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
commit 3333333333333333333333333333333333333333
Merge: 1111111 abc1234
Author: Zuul <zuul@example.org>
Date:   Thu Jan 2 10:00:00 2020 +0000

    Merge \"Fix bug X\"

commit abc1234abc1234abc1234abc1234abc1234abc12
Author: Jane Doe <jane@example.com>
Date:   Wed Jan 1 12:00:00 2020 +0000

    Fix bug X

    Longer explanation that is not part of the summary.

commit 1111111111111111111111111111111111111111
Author: John Roe <john@example.com>
Date:   Tue Dec 31 09:00:00 2019 +0000

    Initial import
";

    #[test]
    fn test_parse_records_in_order() {
        let records = ChangelogRecordParser::parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].commit, "3333333333333333333333333333333333333333");
        assert_eq!(records[1].commit, "abc1234abc1234abc1234abc1234abc1234abc12");
        assert_eq!(records[2].commit, "1111111111111111111111111111111111111111");
    }

    #[test]
    fn test_parse_merge_header() {
        let records = ChangelogRecordParser::parse(SAMPLE).unwrap();
        assert_eq!(records[0].merge_commit.as_deref(), Some("abc1234"));
        assert_eq!(records[0].message, "Merge \"Fix bug X\"");
        assert_eq!(records[1].merge_commit, None);
    }

    #[test]
    fn test_parse_fields() {
        let records = ChangelogRecordParser::parse(SAMPLE).unwrap();
        assert_eq!(records[1].author, "Jane Doe <jane@example.com>");
        assert_eq!(records[1].date, "Wed Jan 1 12:00:00 2020 +0000");
        assert_eq!(records[1].message, "Fix bug X");
    }

    #[test]
    fn test_parse_joins_wrapped_summary() {
        let text = "\
commit aaaaaaa
Author: A <a@example.com>
Date:   Wed Jan 1 12:00:00 2020 +0000

    Summary that wraps
    onto a second line
";
        let records = ChangelogRecordParser::parse(text).unwrap();
        assert_eq!(records[0].message, "Summary that wraps onto a second line");
    }

    #[test]
    fn test_parse_without_commit_fails() {
        let err = ChangelogRecordParser::parse("CHANGES\n=======\n\n* something\n").unwrap_err();
        assert!(matches!(err, ChangesRefreshError::Parse(_)));

        assert!(ChangelogRecordParser::parse("").is_err());
    }

    #[test]
    fn test_parse_ignores_indented_commit_lines() {
        let text = "\
commit aaaaaaa
Author: A <a@example.com>
Date:   Wed Jan 1 12:00:00 2020 +0000

    Revert \"commit bbbbbbb\"
";
        let records = ChangelogRecordParser::parse(text).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_truncated_trailing_record_is_skipped() {
        let text = format!("{}commit 9999999999\nAuthor: Someone <s@example.com>\n", SAMPLE);
        let parsed = ChangelogRecordParser::parse_report(&text).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].commit, "9999999999");
        assert_eq!(parsed.skipped[0].reason, "missing Date line");
    }

    #[test]
    fn test_record_without_message_is_skipped() {
        let text = "\
commit aaaaaaa
Author: A <a@example.com>
Date:   Wed Jan 1 12:00:00 2020 +0000
";
        let parsed = ChangelogRecordParser::parse_report(text).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped[0].reason, "missing message block");
        assert_eq!(parsed.skipped[0].line, 1);
    }
}
