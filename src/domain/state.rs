/// What the spec file says about previously packaged upstream history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagingState {
    /// No upstream commit has been recorded yet
    FirstRun,
    /// The spec already tracks an upstream commit
    Incremental { commit_prefix: String },
}

impl PackagingState {
    /// Build the state from an optional recorded prefix.
    ///
    /// Blank prefixes count as "nothing recorded".
    pub fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix.map(str::trim) {
            Some(p) if !p.is_empty() => PackagingState::Incremental {
                commit_prefix: p.to_string(),
            },
            _ => PackagingState::FirstRun,
        }
    }

    pub fn commit_prefix(&self) -> Option<&str> {
        match self {
            PackagingState::FirstRun => None,
            PackagingState::Incremental { commit_prefix } => Some(commit_prefix),
        }
    }
}
