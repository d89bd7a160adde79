use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use crate::api::{self, BoxApi};
use crate::error::{BoxError, Result};
use crate::summary::TransferSummary;
use crate::upload::{file_name, send_new};

/// Returns the ID of the subfolder `name` under `parent_id`, creating it when
/// no folder of that name exists yet.
pub async fn resolve_or_create_folder<A: BoxApi + ?Sized>(
    api: &A,
    name: &str,
    parent_id: &str,
) -> Result<String> {
    if let Some(existing) = api::find_folder(api, parent_id, name).await? {
        println!("Folder '{name}' already exists (ID: {})", existing.id);
        return Ok(existing.id);
    }

    println!("Creating folder '{name}' in Box...");
    let created = api.create_folder(name, parent_id).await?;
    Ok(created.id)
}

/// Uploads a local file, or mirrors a local directory tree, into a remote
/// folder. Files are always created new; there is no conflict handling.
#[derive(Debug, Clone)]
pub struct TreeUploader {
    folder_id: String,
}

impl TreeUploader {
    pub fn new(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
        }
    }

    pub async fn run<A: BoxApi + ?Sized>(
        &self,
        api: &A,
        local_path: &Path,
    ) -> Result<TransferSummary> {
        if !local_path.exists() {
            return Err(BoxError::LocalPathNotFound(local_path.to_path_buf()));
        }

        println!(
            "Starting upload from {} to Box folder ID {}...",
            local_path.display(),
            self.folder_id
        );

        let summary = if local_path.is_file() {
            let mut summary = TransferSummary::default();
            let name = file_name(local_path)?;
            println!("Uploading single file: {name}...");
            if upload_timed(api, &self.folder_id, local_path, &name).await {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary
        } else {
            self.mirror_directory(api, local_path).await
        };

        println!("\nUpload complete.");
        println!("{} uploaded, {} failed", summary.succeeded, summary.failed);
        Ok(summary)
    }

    /// Walks `root` depth-first in name order, creating or reusing a remote
    /// folder for every local directory and uploading every file into the
    /// remote counterpart of its parent.
    ///
    /// Nothing is rolled back: if a subfolder cannot be resolved its subtree is
    /// skipped and counted as one failure, and whatever was already created
    /// stays in place.
    pub async fn mirror_directory<A: BoxApi + ?Sized>(
        &self,
        api: &A,
        root: &Path,
    ) -> TransferSummary {
        let mut summary = TransferSummary::default();
        let mut remote_ids: HashMap<PathBuf, String> = HashMap::new();
        remote_ids.insert(root.to_path_buf(), self.folder_id.clone());

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    eprintln!("✗ Could not read local entry: {e}");
                    summary.failed += 1;
                    continue;
                }
            };

            let Some(parent_id) = entry
                .path()
                .parent()
                .and_then(|parent| remote_ids.get(parent))
                .cloned()
            else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().is_dir() {
                match resolve_or_create_folder(api, &name, &parent_id).await {
                    Ok(folder_id) => {
                        remote_ids.insert(entry.path().to_path_buf(), folder_id);
                    }
                    Err(e) => {
                        eprintln!("✗ Failed to create folder '{name}': {e}");
                        summary.failed += 1;
                        walker.skip_current_dir();
                    }
                }
            } else if entry.file_type().is_file() {
                println!("Uploading file: {}...", entry.path().display());
                if upload_timed(api, &parent_id, entry.path(), &name).await {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

async fn upload_timed<A: BoxApi + ?Sized>(
    api: &A,
    parent_id: &str,
    local: &Path,
    name: &str,
) -> bool {
    let start = Instant::now();
    match send_new(api, parent_id, name, local).await {
        Ok(_) => {
            let elapsed = start.elapsed().as_secs_f64();
            println!("✓ Uploaded '{name}' (Time: {elapsed:.2}s)");
            true
        }
        Err(e) => {
            eprintln!("✗ Upload failed for {name}: {e}");
            false
        }
    }
}
