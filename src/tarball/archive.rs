use crate::error::{ChangesRefreshError, Result};
use crate::tarball::{TarballContents, TarballProvider};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressionFormat {
    None,
    Gzip,
    Xz,
}

impl CompressionFormat {
    /// Guess the compression from the archive's file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(CompressionFormat::Gzip)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(CompressionFormat::Xz)
        } else if name.ends_with(".tar") {
            Some(CompressionFormat::None)
        } else {
            None
        }
    }
}

fn decompression_stream(format: CompressionFormat, file: File) -> Box<dyn Read> {
    match format {
        CompressionFormat::None => Box::new(file),
        CompressionFormat::Gzip => Box::new(flate2::read::GzDecoder::new(file)),
        CompressionFormat::Xz => Box::new(xz2::read::XzDecoder::new(file)),
    }
}

/// Reads tarballs from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveTarballProvider;

impl TarballProvider for ArchiveTarballProvider {
    fn open(&self, archive: &Path) -> Result<TarballContents> {
        let archive_name = archive.display();
        let format = CompressionFormat::from_path(archive).ok_or_else(|| {
            ChangesRefreshError::archive(format!("unsupported archive type: {}", archive_name))
        })?;

        let file = File::open(archive)
            .map_err(|e| ChangesRefreshError::archive(format!("opening {}: {}", archive_name, e)))?;
        let mut tar = tar::Archive::new(decompression_stream(format, file));

        let mut top_level_dir: Option<String> = None;
        // (path depth, contents) of the shallowest ChangeLog seen so far
        let mut changelog: Option<(usize, Vec<u8>)> = None;

        let entries = tar.entries().map_err(|e| {
            ChangesRefreshError::archive(format!("reading entries of {}: {}", archive_name, e))
        })?;

        for entry in entries {
            let mut entry = entry.map_err(|e| {
                ChangesRefreshError::archive(format!("resolving entry in {}: {}", archive_name, e))
            })?;

            let entry_type = entry.header().entry_type();
            if entry_type.is_pax_global_extensions() || entry_type.is_pax_local_extensions() {
                continue;
            }

            let components: Vec<String> = entry
                .path()
                .map_err(|e| {
                    ChangesRefreshError::archive(format!("entry path in {}: {}", archive_name, e))
                })?
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();

            let Some(first) = components.first() else {
                continue;
            };
            if top_level_dir.is_none() {
                top_level_dir = Some(first.clone());
            }

            let is_changelog = entry_type.is_file()
                && components
                    .last()
                    .map_or(false, |name| name.ends_with("ChangeLog"));
            let shallower = changelog
                .as_ref()
                .map_or(true, |(depth, _)| components.len() < *depth);

            if is_changelog && shallower {
                debug!("found {} in {}", components.join("/"), archive_name);
                let mut data = Vec::new();
                entry.read_to_end(&mut data).map_err(|e| {
                    ChangesRefreshError::archive(format!("reading ChangeLog from {}: {}", archive_name, e))
                })?;
                changelog = Some((components.len(), data));
            }
        }

        let top_level_dir = top_level_dir
            .ok_or_else(|| ChangesRefreshError::archive(format!("{} is empty", archive_name)))?;
        let (_, changelog) =
            changelog.ok_or_else(|| ChangesRefreshError::ChangelogNotFound(archive_name.to_string()))?;

        Ok(TarballContents {
            top_level_dir,
            changelog,
        })
    }
}
