//! Domain types - pure data independent of archives and files

pub mod commit;
pub mod state;
pub mod version;

pub use commit::{short_hash, CommitRecord, SHORT_HASH_LEN};
pub use state::PackagingState;
pub use version::{extract_upstream_version, PackageVersion, DEFAULT_VERSION_REGEX};
