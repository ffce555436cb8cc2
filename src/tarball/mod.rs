//! Upstream tarball access
//!
//! The refresh workflow only needs two things from a release tarball: the
//! name of its top-level directory and the bytes of its `ChangeLog` member.
//! The [TarballProvider] trait captures that, with two implementations:
//!
//! - [archive::ArchiveTarballProvider]: reads real `.tar`, `.tar.gz` and `.tar.xz` files
//! - [mock::MockTarballProvider]: serves canned contents for tests
//!
//! Fetching the tarball over HTTP lives in [download].

pub mod archive;
pub mod download;
pub mod mock;

pub use archive::{ArchiveTarballProvider, CompressionFormat};
pub use download::download;
pub use mock::MockTarballProvider;

use crate::error::Result;
use std::path::Path;

/// What the workflow extracts from a tarball
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarballContents {
    /// First path component shared by the archive members (e.g. `myproj-2.3.1`)
    pub top_level_dir: String,
    /// Raw bytes of the member whose path ends in `ChangeLog`
    pub changelog: Vec<u8>,
}

impl TarballContents {
    /// ChangeLog bytes as text, replacing invalid UTF-8
    pub fn changelog_text(&self) -> String {
        String::from_utf8_lossy(&self.changelog).into_owned()
    }
}

/// Read access to release tarballs
///
/// ## Error Handling
///
/// Implementations report unreadable archives as
/// [crate::error::ChangesRefreshError::ArchiveRead] and a missing `ChangeLog`
/// member as [crate::error::ChangesRefreshError::ChangelogNotFound].
pub trait TarballProvider {
    /// Open the archive at `archive` and pull out its top-level directory
    /// name and ChangeLog.
    ///
    /// When several members end in `ChangeLog` the one closest to the archive
    /// root wins.
    ///
    /// # Example
    /// ```rust
    /// # use changes_refresh::tarball::TarballProvider;
    /// # use std::path::Path;
    /// # fn example<P: TarballProvider>(provider: &P) -> changes_refresh::Result<()> {
    /// let contents = provider.open(Path::new("myproj-2.3.1.tar.gz"))?;
    /// println!("{} ships {} bytes of ChangeLog", contents.top_level_dir, contents.changelog.len());
    /// # Ok(())
    /// # }
    /// ```
    fn open(&self, archive: &Path) -> Result<TarballContents>;
}
