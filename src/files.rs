//! Spec and changes file persistence.

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Read `path`, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Replace the contents of `path` with `content`.
///
/// The data goes to a temporary file in the same directory, is flushed and
/// synced, then renamed over the target. On any error the target is left as
/// it was and the temporary file is removed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Put `entry` in front of the existing changes-file text.
pub fn prepend_entry(existing: &str, entry: &str) -> String {
    let mut combined = String::with_capacity(entry.len() + existing.len());
    combined.push_str(entry);
    combined.push_str(existing);
    combined
}
