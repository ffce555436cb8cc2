use crate::error::{ChangesRefreshError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Obtain an HTTP client, taking proxy environment variables into account.
pub fn get_http_client() -> reqwest::Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::ClientBuilder::new();

    for (key, value) in std::env::vars() {
        let key = key.to_lowercase();
        let Some(schema) = key.strip_suffix("_proxy") else {
            continue;
        };

        if let Ok(url) = Url::parse(&value) {
            let proxy = match schema {
                "http" => Some(reqwest::Proxy::http(url.as_str())),
                "https" => Some(reqwest::Proxy::https(url.as_str())),
                _ => None,
            };
            if let Some(Ok(proxy)) = proxy {
                builder = builder.proxy(proxy);
            }
        }
    }

    builder.build()
}

/// File name a download of `url` is saved under: its last path segment.
pub fn archive_file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .last()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
}

/// Download `url` into `dest_dir`, returning the path of the saved tarball.
///
/// The body is written to a temporary file next to the destination and only
/// moved into place once complete.
pub fn download(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let parsed = Url::parse(url)
        .map_err(|e| ChangesRefreshError::download(format!("invalid URL '{}': {}", url, e)))?;
    let file_name = archive_file_name(&parsed).ok_or_else(|| {
        ChangesRefreshError::download(format!("cannot derive a file name from '{}'", url))
    })?;

    info!("downloading {}", url);
    let client = get_http_client()?;
    let response = client.get(parsed).send()?.error_for_status()?;
    let data = response.bytes()?;
    debug!("received {} bytes", data.len());

    save_download(&data, dest_dir, &file_name)
}

/// Store downloaded `data` as `dest_dir/file_name`.
///
/// # Errors
/// Any IO failure is a [`ChangesRefreshError::Download`].
pub fn save_download(data: &[u8], dest_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let dest = dest_dir.join(file_name);
    let saving =
        |e: std::io::Error| ChangesRefreshError::download(format!("saving {}: {}", dest.display(), e));

    let mut tmp = tempfile::NamedTempFile::new_in(dest_dir).map_err(saving)?;
    tmp.write_all(data).map_err(saving)?;
    tmp.flush().map_err(saving)?;
    tmp.persist(&dest).map_err(|e| saving(e.error))?;

    Ok(dest)
}
