use crate::domain::CommitRecord;

/// Splits a newest-first record list at the last packaged commit
pub struct CommitDiffer;

impl CommitDiffer {
    /// Commits newer than the packaged one, newest first.
    ///
    /// Walks `records` until one whose identifier starts with
    /// `packaged_commit_prefix`; that record and everything older is dropped.
    /// When nothing matches, every record is returned.
    pub fn diff(records: &[CommitRecord], packaged_commit_prefix: &str) -> Vec<CommitRecord> {
        records
            .iter()
            .take_while(|record| !record.commit.starts_with(packaged_commit_prefix))
            .cloned()
            .collect()
    }

    /// Position of the packaged commit in `records`, if present.
    pub fn find(records: &[CommitRecord], packaged_commit_prefix: &str) -> Option<usize> {
        records
            .iter()
            .position(|record| record.commit.starts_with(packaged_commit_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(hashes: &[&str]) -> Vec<CommitRecord> {
        hashes
            .iter()
            .map(|h| CommitRecord::new(*h, "A", "D", format!("message {}", h)))
            .collect()
    }

    #[test]
    fn test_diff_stops_at_packaged_commit() {
        let all = records(&["c3c3c3c3c3", "c2c2c2c2c2", "c1c1c1c1c1"]);
        let new = CommitDiffer::diff(&all, "c1c1c1c");
        assert_eq!(new, all[..2].to_vec());
    }

    #[test]
    fn test_diff_first_record_matches() {
        let all = records(&["c3c3c3c3c3", "c2c2c2c2c2"]);
        assert!(CommitDiffer::diff(&all, "c3c3c3c3c3").is_empty());
    }

    #[test]
    fn test_diff_without_match_returns_everything() {
        let all = records(&["c3c3c3c3c3", "c2c2c2c2c2", "c1c1c1c1c1"]);
        assert_eq!(CommitDiffer::diff(&all, "deadbee"), all);
        assert_eq!(CommitDiffer::find(&all, "deadbee"), None);
    }

    #[test]
    fn test_find_reports_position() {
        let all = records(&["c3c3c3c3c3", "c2c2c2c2c2", "c1c1c1c1c1"]);
        assert_eq!(CommitDiffer::find(&all, "c2c2"), Some(1));
    }

    #[test]
    fn test_diff_empty_input() {
        assert!(CommitDiffer::diff(&[], "abc1234").is_empty());
    }
}
