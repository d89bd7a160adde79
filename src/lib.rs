//! # box-sync
//!
//! Library behind the four Box transfer tools: download a folder's archives,
//! upload archives with a conflict policy, or mirror a local tree into a
//! folder, authenticating with a JWT credential bundle or a developer token.
//!
//! Remote access goes through the [`BoxApi`] trait so the transfer logic can
//! run against [`BoxClient`] or an in-memory stand-in.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod folder_url;
pub mod logging;
pub mod mirror;
pub mod summary;
pub mod upload;

pub use api::{BoxApi, ItemType, RemoteItem, LIST_LIMIT};
pub use auth::{Credentials, JwtConfig};
pub use client::{BoxClient, Endpoints};
pub use download::{Downloader, DEFAULT_EXTENSIONS};
pub use error::{BoxError, Result};
pub use folder_url::extract_folder_id;
pub use mirror::TreeUploader;
pub use summary::TransferSummary;
pub use upload::{resolve_conflict, ConflictAction, UploadMode, ZipUploader};
