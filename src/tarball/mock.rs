use crate::error::{ChangesRefreshError, Result};
use crate::tarball::{TarballContents, TarballProvider};
use std::path::Path;

/// Mock provider serving fixed contents without touching the filesystem
pub struct MockTarballProvider {
    top_level_dir: String,
    changelog: Option<Vec<u8>>,
}

impl MockTarballProvider {
    /// Create a provider for an archive whose members live under `top_level_dir`
    pub fn new(top_level_dir: impl Into<String>) -> Self {
        MockTarballProvider {
            top_level_dir: top_level_dir.into(),
            changelog: None,
        }
    }

    /// Set the ChangeLog member's contents
    pub fn with_changelog(mut self, text: impl Into<String>) -> Self {
        self.changelog = Some(text.into().into_bytes());
        self
    }
}

impl TarballProvider for MockTarballProvider {
    fn open(&self, archive: &Path) -> Result<TarballContents> {
        let changelog = self
            .changelog
            .clone()
            .ok_or_else(|| ChangesRefreshError::ChangelogNotFound(archive.display().to_string()))?;

        Ok(TarballContents {
            top_level_dir: self.top_level_dir.clone(),
            changelog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_serves_changelog() {
        let provider = MockTarballProvider::new("myproj-1.0").with_changelog("commit abc\n");
        let contents = provider.open(Path::new("myproj-1.0.tar.gz")).unwrap();
        assert_eq!(contents.top_level_dir, "myproj-1.0");
        assert_eq!(contents.changelog_text(), "commit abc\n");
    }

    #[test]
    fn test_mock_without_changelog() {
        let provider = MockTarballProvider::new("myproj-1.0");
        let err = provider.open(Path::new("myproj-1.0.tar.gz")).unwrap_err();
        assert!(matches!(err, ChangesRefreshError::ChangelogNotFound(_)));
    }
}
