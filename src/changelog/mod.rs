//! Changelog engine: parse upstream history, find what is new, render it.
//!
//! - [`parser`] - ChangeLog text to [`CommitRecord`](crate::domain::CommitRecord)s
//! - [`differ`] - cut the records at the last packaged commit
//! - [`renderer`] - format new records as a changes-file entry

pub mod differ;
pub mod parser;
pub mod renderer;

pub use differ::CommitDiffer;
pub use parser::{ChangelogRecordParser, ParsedChangelog, SkippedFragment};
pub use renderer::{ChangeEntryRenderer, SEPARATOR_WIDTH, TIMESTAMP_FORMAT};
