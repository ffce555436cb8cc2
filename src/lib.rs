pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod files;
pub mod spec_file;
pub mod tarball;
pub mod ui;

pub use error::{ChangesRefreshError, Result};
