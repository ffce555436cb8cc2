/// Number of hex characters used for abbreviated commit identifiers.
pub const SHORT_HASH_LEN: usize = 7;

/// One commit entry read from an upstream ChangeLog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit identifier as printed by the log tool
    pub commit: String,
    /// Second parent when this is a merge commit
    pub merge_commit: Option<String>,
    pub author: String,
    pub date: String,
    /// First paragraph of the commit message, whitespace-normalized
    pub message: String,
}

impl CommitRecord {
    /// Create a non-merge record
    pub fn new(
        commit: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CommitRecord {
            commit: commit.into(),
            merge_commit: None,
            author: author.into(),
            date: date.into(),
            message: message.into(),
        }
    }

    /// Attach a second parent, turning the record into a merge
    pub fn with_merge(mut self, merge_commit: impl Into<String>) -> Self {
        self.merge_commit = Some(merge_commit.into());
        self
    }

    pub fn is_merge(&self) -> bool {
        self.merge_commit.is_some()
    }

    /// First seven characters of the commit identifier (or the whole
    /// identifier when shorter)
    pub fn short_hash(&self) -> &str {
        short_hash(&self.commit)
    }

    /// Summary carried by a `Merge "<summary>"` message.
    ///
    /// Returns `None` when the message does not have that shape.
    pub fn merge_summary(&self) -> Option<&str> {
        self.message
            .strip_prefix("Merge \"")
            .and_then(|rest| rest.strip_suffix('"'))
    }
}

/// Abbreviate a commit identifier to [`SHORT_HASH_LEN`] characters.
pub fn short_hash(commit: &str) -> &str {
    match commit.char_indices().nth(SHORT_HASH_LEN) {
        Some((idx, _)) => &commit[..idx],
        None => commit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let record = CommitRecord::new(
            "abc1234def5678abc1234def5678abc1234def56",
            "A",
            "D",
            "msg",
        );
        assert_eq!(record.short_hash(), "abc1234");
        assert_eq!(short_hash("abc"), "abc");
    }

    #[test]
    fn test_merge_summary() {
        let merge = CommitRecord::new("1111111", "A", "D", "Merge \"Fix bug X\"").with_merge("abc1234");
        assert!(merge.is_merge());
        assert_eq!(merge.merge_summary(), Some("Fix bug X"));
    }

    #[test]
    fn test_merge_summary_requires_quotes() {
        let merge = CommitRecord::new("1111111", "A", "D", "Merge branch 'stable'").with_merge("abc1234");
        assert_eq!(merge.merge_summary(), None);

        let unterminated = CommitRecord::new("1111111", "A", "D", "Merge \"Fix bug X");
        assert_eq!(unterminated.merge_summary(), None);
    }
}
