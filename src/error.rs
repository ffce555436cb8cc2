use thiserror::Error;

/// Unified error type for changes-refresh operations
#[derive(Error, Debug)]
pub enum ChangesRefreshError {
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Cannot read archive: {0}")]
    ArchiveRead(String),

    #[error("No ChangeLog member found in {0}")]
    ChangelogNotFound(String),

    #[error("Version pattern error: {0}")]
    VersionPattern(String),

    #[error("Changelog parse error: {0}")]
    Parse(String),

    #[error("Spec file error: {0}")]
    SpecFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in changes-refresh
pub type Result<T> = std::result::Result<T, ChangesRefreshError>;

impl ChangesRefreshError {
    /// Create a download error with context
    pub fn download(msg: impl Into<String>) -> Self {
        ChangesRefreshError::Download(msg.into())
    }

    /// Create an archive read error with context
    pub fn archive(msg: impl Into<String>) -> Self {
        ChangesRefreshError::ArchiveRead(msg.into())
    }

    /// Create a version pattern error with context
    pub fn version_pattern(msg: impl Into<String>) -> Self {
        ChangesRefreshError::VersionPattern(msg.into())
    }

    /// Create a changelog parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        ChangesRefreshError::Parse(msg.into())
    }

    /// Create a spec file error with context
    pub fn spec(msg: impl Into<String>) -> Self {
        ChangesRefreshError::SpecFormat(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangesRefreshError::Config(msg.into())
    }

    /// Whether the error can be downgraded to "no change list available".
    ///
    /// Every other kind aborts the refresh.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChangesRefreshError::Parse(_))
    }
}

impl From<reqwest::Error> for ChangesRefreshError {
    fn from(err: reqwest::Error) -> Self {
        ChangesRefreshError::Download(err.to_string())
    }
}
