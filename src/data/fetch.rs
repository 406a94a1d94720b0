//! Remote Dataset Fallback
//! Downloads the archive once when it is missing locally.

use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Download failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fixed remote location of the dataset archive.
pub const DATA_URL: &str = "https://ehw.fit.vutbr.cz/izv/data.zip";

/// File-provisioning collaborator. Injected so tests never touch the
/// network.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Blocking HTTP download of a single file.
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = reqwest::blocking::get(url)?.error_for_status()?;
        let bytes = response.bytes()?;
        fs::write(dest, &bytes)?;
        Ok(())
    }
}

/// Make sure the archive exists at `path`, fetching it once if not.
/// Fetch failures are fatal; there is no retry.
pub fn ensure_archive(path: &Path, url: &str, fetcher: &dyn Fetcher) -> Result<(), FetchError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    log::info!("Archive missing, fetching {} to {}", url, path.display());
    fetcher.fetch(url, path)
}
