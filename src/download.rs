use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

use crate::api::{self, BoxApi, RemoteItem};
use crate::error::Result;
use crate::summary::TransferSummary;

/// Suffixes downloaded when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".zip", ".isx"];

/// Normalizes a user-supplied suffix list: lower-cased, dot-prefixed, no blanks.
pub fn normalize_extensions<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|ext| ext.as_ref().trim().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext != ".")
        .map(|ext| if ext.starts_with('.') { ext } else { format!(".{ext}") })
        .collect()
}

/// Downloads the files of one remote folder whose names end with an allowed
/// suffix into a local directory.
#[derive(Debug, Clone)]
pub struct Downloader {
    download_dir: PathBuf,
    extensions: Vec<String>,
}

impl Downloader {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self::with_extensions(download_dir, DEFAULT_EXTENSIONS)
    }

    pub fn with_extensions<S: AsRef<str>>(
        download_dir: impl Into<PathBuf>,
        extensions: &[S],
    ) -> Self {
        let mut extensions = normalize_extensions(extensions);
        if extensions.is_empty() {
            extensions = normalize_extensions(DEFAULT_EXTENSIONS);
        }
        Self {
            download_dir: download_dir.into(),
            extensions,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Case-insensitive suffix match on files only.
    pub fn wants(&self, item: &RemoteItem) -> bool {
        if !item.is_file() {
            return false;
        }
        let name = item.name.to_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Creates the download directory (with parents) if it is missing.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.download_dir).await?;
        Ok(())
    }

    /// Lists the folder once and downloads every wanted file, one at a time.
    ///
    /// Directory creation and the listing are fatal on error. A failing item is
    /// reported and counted, and the batch moves on to the next one.
    pub async fn run<A: BoxApi + ?Sized>(
        &self,
        api: &A,
        folder_id: &str,
    ) -> Result<TransferSummary> {
        self.prepare().await?;
        let items = api::list_folder(api, folder_id).await?;

        let mut summary = TransferSummary::default();
        for item in items.iter().filter(|item| self.wants(item)) {
            println!("Downloading {}...", item.name);
            let start = Instant::now();

            match self.download_one(api, item).await {
                Ok(path) => {
                    let elapsed = start.elapsed().as_secs_f64();
                    println!("✓ Saved to {} (Time: {elapsed:.2}s)", path.display());
                    summary.succeeded += 1;
                }
                Err(e) => {
                    eprintln!("✗ Failed to download {}: {e}", item.name);
                    summary.failed += 1;
                }
            }
        }

        println!(
            "\nDownload complete: {} file(s) with extensions {}",
            summary.succeeded,
            self.extensions.join(", ")
        );
        Ok(summary)
    }

    async fn download_one<A: BoxApi + ?Sized>(
        &self,
        api: &A,
        item: &RemoteItem,
    ) -> Result<PathBuf> {
        let local_path = self.download_dir.join(&item.name);

        // Any existing local file is truncated and replaced.
        let mut file = tokio::fs::File::create(&local_path).await?;
        let bytes = api.download_file(&item.id, &mut file).await?;
        debug!(name = %item.name, bytes, "download finished");

        Ok(local_path)
    }
}
