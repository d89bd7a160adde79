use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs::File;

use crate::error::Result;

/// Page size used for every folder listing. Only one page is ever fetched.
pub const LIST_LIMIT: u32 = 1000;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    File,
    Folder,
    WebLink,
}

/// A direct child of a remote folder, as returned by a listing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

impl RemoteItem {
    pub fn is_file(&self) -> bool {
        self.item_type == ItemType::File
    }

    pub fn is_folder(&self) -> bool {
        self.item_type == ItemType::Folder
    }
}

/// The remote operations the transfer engines need.
///
/// `client::BoxClient` talks to the real service; tests supply an in-memory
/// implementation.
#[async_trait]
pub trait BoxApi: Send + Sync {
    /// Lists up to `limit` direct children of a folder, in backend order.
    async fn list_children(&self, folder_id: &str, limit: u32) -> Result<Vec<RemoteItem>>;

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<RemoteItem>;

    /// Uploads `content` as a new file named `name` under `parent_id`.
    async fn upload_file(&self, parent_id: &str, name: &str, content: File) -> Result<RemoteItem>;

    /// Attaches `content` as a new version of an existing file.
    async fn upload_new_version(
        &self,
        file_id: &str,
        name: &str,
        content: File,
    ) -> Result<RemoteItem>;

    async fn delete_file(&self, file_id: &str) -> Result<()>;

    /// Streams the file's content into `dest`, returning the bytes written.
    async fn download_file(&self, file_id: &str, dest: &mut File) -> Result<u64>;
}

/// Fetches a folder's children with the fixed page size, narrating progress.
pub async fn list_folder<A: BoxApi + ?Sized>(api: &A, folder_id: &str) -> Result<Vec<RemoteItem>> {
    println!("Fetching items from folder ID {folder_id}...");
    let items = api.list_children(folder_id, LIST_LIMIT).await?;
    println!("Found {} items.", items.len());
    Ok(items)
}

/// Linear scan of a folder listing for a file with exactly this name.
pub async fn find_file<A: BoxApi + ?Sized>(
    api: &A,
    folder_id: &str,
    name: &str,
) -> Result<Option<RemoteItem>> {
    let items = api.list_children(folder_id, LIST_LIMIT).await?;
    Ok(items.into_iter().find(|item| item.is_file() && item.name == name))
}

/// Linear scan of a folder listing for a subfolder with exactly this name.
pub async fn find_folder<A: BoxApi + ?Sized>(
    api: &A,
    parent_id: &str,
    name: &str,
) -> Result<Option<RemoteItem>> {
    let items = api.list_children(parent_id, LIST_LIMIT).await?;
    Ok(items.into_iter().find(|item| item.is_folder() && item.name == name))
}
