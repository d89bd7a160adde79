//! Mode-gated uploads of `.zip` archives into a single remote folder.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

use crate::api::{self, BoxApi, RemoteItem};
use crate::error::{BoxError, Result};
use crate::summary::TransferSummary;

/// What to do when a file of the same name already exists remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UploadMode {
    /// Only upload new files, skip existing ones
    Upload,
    /// Delete the existing file, then upload
    #[default]
    Overwrite,
    /// Upload as a new version of the existing file
    Update,
}

impl fmt::Display for UploadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UploadMode::Upload => "upload",
            UploadMode::Overwrite => "overwrite",
            UploadMode::Update => "update",
        })
    }
}

/// The single remote action chosen for one local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    Skip { file_id: String },
    Create,
    Replace { file_id: String },
    NewVersion { file_id: String },
}

/// Decision table for one file given the mode and any same-named remote file.
pub fn resolve_conflict(mode: UploadMode, existing: Option<&RemoteItem>) -> ConflictAction {
    let Some(existing) = existing else {
        return ConflictAction::Create;
    };
    let file_id = existing.id.clone();
    match mode {
        UploadMode::Upload => ConflictAction::Skip { file_id },
        UploadMode::Overwrite => ConflictAction::Replace { file_id },
        UploadMode::Update => ConflictAction::NewVersion { file_id },
    }
}

/// Result of handling one file, before it is folded into the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Uploaded,
    Skipped,
    Failed,
}

pub(crate) fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| BoxError::LocalPathNotFound(path.to_path_buf()))
}

/// Opens `local` and uploads it as a new file under `parent_id`.
pub async fn send_new<A: BoxApi + ?Sized>(
    api: &A,
    parent_id: &str,
    name: &str,
    local: &Path,
) -> Result<RemoteItem> {
    let file = tokio::fs::File::open(local).await?;
    api.upload_file(parent_id, name, file).await
}

async fn send_version<A: BoxApi + ?Sized>(
    api: &A,
    file_id: &str,
    name: &str,
    local: &Path,
) -> Result<RemoteItem> {
    let file = tokio::fs::File::open(local).await?;
    api.upload_new_version(file_id, name, file).await
}

fn is_zip(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".zip"))
}

/// Uploads one `.zip` file, or every `.zip` directly inside a directory, to a
/// remote folder, resolving name conflicts according to the mode.
#[derive(Debug, Clone)]
pub struct ZipUploader {
    folder_id: String,
    mode: UploadMode,
}

impl ZipUploader {
    pub fn new(folder_id: impl Into<String>, mode: UploadMode) -> Self {
        Self {
            folder_id: folder_id.into(),
            mode,
        }
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    /// Collects the archives to upload from `local_path`.
    ///
    /// A file counts only if it is a `.zip`; a directory contributes its
    /// immediate `.zip` children in name order. Subdirectories are ignored.
    pub fn collect(local_path: &Path) -> Result<Vec<PathBuf>> {
        if !local_path.exists() {
            return Err(BoxError::LocalPathNotFound(local_path.to_path_buf()));
        }

        if local_path.is_file() {
            if is_zip(local_path) {
                return Ok(vec![local_path.to_path_buf()]);
            }
            warn!(path = %local_path.display(), "not a .zip file, nothing to upload");
            return Ok(Vec::new());
        }

        let mut zips = Vec::new();
        for entry in std::fs::read_dir(local_path)? {
            let path = entry?.path();
            if path.is_file() && is_zip(&path) {
                zips.push(path);
            }
        }
        zips.sort();
        Ok(zips)
    }

    /// Uploads everything `collect` finds. Only a missing local path is fatal.
    pub async fn run<A: BoxApi + ?Sized>(
        &self,
        api: &A,
        local_path: &Path,
    ) -> Result<TransferSummary> {
        println!("\n=== Starting ZIP Upload ===");
        println!("Mode: {}", self.mode);
        println!("===========================\n");

        let zips = Self::collect(local_path)?;
        let mut summary = TransferSummary::default();

        if local_path.is_dir() {
            if zips.is_empty() {
                println!("⚠ No ZIP files found in directory");
                return Ok(summary);
            }
            println!("Found {} ZIP file(s) to upload\n", zips.len());
        }

        for zip in &zips {
            match self.upload_one(api, zip).await {
                FileOutcome::Uploaded => summary.succeeded += 1,
                FileOutcome::Skipped => summary.skipped += 1,
                FileOutcome::Failed => summary.failed += 1,
            }
        }

        println!("\n=== Upload Complete ===");
        println!(
            "{} uploaded, {} skipped, {} failed",
            summary.succeeded, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    /// Handles one archive. Every remote mutation reports its own failure.
    pub async fn upload_one<A: BoxApi + ?Sized>(&self, api: &A, zip_path: &Path) -> FileOutcome {
        let name = match file_name(zip_path) {
            Ok(name) => name,
            Err(e) => {
                eprintln!("✗ Skipping {}: {e}", zip_path.display());
                return FileOutcome::Failed;
            }
        };

        let existing = match api::find_file(api, &self.folder_id, &name).await {
            Ok(found) => found,
            Err(e) => {
                // Treated as absent; a real clash then surfaces from the create.
                eprintln!("Error listing folder: {e}");
                None
            }
        };

        match resolve_conflict(self.mode, existing.as_ref()) {
            ConflictAction::Skip { .. } => {
                println!("⊘ Skipping existing file: {name}");
                FileOutcome::Skipped
            }
            ConflictAction::NewVersion { file_id } => {
                println!("↻ Updating existing version: {name}");
                match send_version(api, &file_id, &name, zip_path).await {
                    Ok(uploaded) => {
                        println!("✓ Updated file (ID: {})", uploaded.id);
                        FileOutcome::Uploaded
                    }
                    Err(e) => {
                        eprintln!("✗ Failed to update {name}: {e}");
                        FileOutcome::Failed
                    }
                }
            }
            ConflictAction::Replace { file_id } => {
                println!("↻ Overwriting existing file: {name}");
                if let Err(e) = api.delete_file(&file_id).await {
                    eprintln!("✗ Failed to delete file ID {file_id}: {e}");
                    return FileOutcome::Failed;
                }
                println!("✓ Deleted existing file ID {file_id}");
                self.create(api, &name, zip_path).await
            }
            ConflictAction::Create => self.create(api, &name, zip_path).await,
        }
    }

    async fn create<A: BoxApi + ?Sized>(
        &self,
        api: &A,
        name: &str,
        zip_path: &Path,
    ) -> FileOutcome {
        println!("↑ Uploading new file: {name}");
        let start = Instant::now();
        match send_new(api, &self.folder_id, name, zip_path).await {
            Ok(uploaded) => {
                let elapsed = start.elapsed().as_secs_f64();
                println!("✓ Uploaded file: {name} (ID: {}, Time: {elapsed:.2}s)", uploaded.id);
                FileOutcome::Uploaded
            }
            Err(e) => {
                eprintln!("✗ Failed to upload {name}: {e}");
                FileOutcome::Failed
            }
        }
    }
}
