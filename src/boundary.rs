use crate::domain::short_hash;
use std::fmt;

/// Non-fatal conditions met while refreshing a package.
/// These are reported to the user but do not stop the refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The packaged commit is already the newest upstream commit
    NoNewCommits { packaged_commit: String },
    /// The packaged commit does not appear in the ChangeLog, so every commit is treated as new
    PackagedCommitNotFound { packaged_commit: String },
    /// The ChangeLog holds no commit list; the spec is updated without a changes entry
    ChangelogUnavailable { reason: String },
    /// Commit blocks dropped because they lacked an author, date or message
    MalformedRecordsSkipped { count: usize, first_commit: String },
    /// No commit was recorded in the spec yet; only the spec is initialized
    FirstRun,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { packaged_commit } => {
                write!(
                    f,
                    "No new commits since packaged commit {}",
                    short_hash(packaged_commit)
                )
            }
            BoundaryWarning::PackagedCommitNotFound { packaged_commit } => {
                write!(
                    f,
                    "Packaged commit {} not found in ChangeLog; treating all commits as new",
                    packaged_commit
                )
            }
            BoundaryWarning::ChangelogUnavailable { reason } => {
                write!(f, "No change list available: {}", reason)
            }
            BoundaryWarning::MalformedRecordsSkipped {
                count,
                first_commit,
            } => {
                write!(
                    f,
                    "Skipped {} malformed ChangeLog record(s), first at commit {}",
                    count,
                    short_hash(first_commit)
                )
            }
            BoundaryWarning::FirstRun => {
                write!(
                    f,
                    "No packaged commit recorded; initializing spec without a changes entry"
                )
            }
        }
    }
}
