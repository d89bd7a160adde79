//! In-memory stand-in for the Box API used by the engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use box_sync::{BoxApi, BoxError, ItemType, RemoteItem, Result};
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const ROOT: &str = "0";

/// Every remote call the fake receives, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    List { folder_id: String, limit: u32 },
    CreateFolder { name: String, parent_id: String },
    Upload { parent_id: String, name: String },
    NewVersion { file_id: String, name: String },
    Delete { file_id: String },
    Download { file_id: String },
}

#[derive(Debug, Clone)]
struct Entry {
    item: RemoteItem,
    parent_id: String,
    content: Vec<u8>,
    versions: u32,
}

#[derive(Default)]
struct State {
    next_id: u64,
    entries: Vec<Entry>,
    ops: Vec<Op>,
    failing_names: HashSet<String>,
    failing_lists: bool,
    failing_deletes: bool,
}

#[derive(Default)]
pub struct FakeBox {
    state: Mutex<State>,
}

fn injected(what: &str, name: &str) -> BoxError {
    BoxError::Api {
        status: 500,
        code: Some("injected".to_string()),
        message: format!("injected {what} failure for {name}"),
    }
}

impl FakeBox {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, parent_id: &str, name: &str, item_type: ItemType, content: &[u8]) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("{}", 1000 + state.next_id);
        state.entries.push(Entry {
            item: RemoteItem {
                id: id.clone(),
                name: name.to_string(),
                item_type,
            },
            parent_id: parent_id.to_string(),
            content: content.to_vec(),
            versions: 1,
        });
        id
    }

    pub fn add_file(&self, parent_id: &str, name: &str, content: &[u8]) -> String {
        self.insert(parent_id, name, ItemType::File, content)
    }

    pub fn add_folder(&self, parent_id: &str, name: &str) -> String {
        self.insert(parent_id, name, ItemType::Folder, b"")
    }

    /// Makes every upload, download, or folder creation for `name` fail.
    pub fn fail_on(&self, name: &str) {
        self.state.lock().unwrap().failing_names.insert(name.to_string());
    }

    pub fn fail_listings(&self) {
        self.state.lock().unwrap().failing_lists = true;
    }

    pub fn fail_deletes(&self) {
        self.state.lock().unwrap().failing_deletes = true;
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Operations other than listings, which are read-only.
    pub fn mutations(&self) -> Vec<Op> {
        self.ops()
            .into_iter()
            .filter(|op| !matches!(op, Op::List { .. } | Op::Download { .. }))
            .collect()
    }

    pub fn children(&self, parent_id: &str) -> Vec<RemoteItem> {
        let state = self.state.lock().unwrap();
        state
            .entries
            .iter()
            .filter(|e| e.parent_id == parent_id)
            .map(|e| e.item.clone())
            .collect()
    }

    pub fn child_named(&self, parent_id: &str, name: &str) -> Option<RemoteItem> {
        self.children(parent_id).into_iter().find(|item| item.name == name)
    }

    pub fn content(&self, file_id: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .entries
            .iter()
            .find(|e| e.item.id == file_id)
            .map(|e| e.content.clone())
    }

    pub fn versions(&self, file_id: &str) -> u32 {
        let state = self.state.lock().unwrap();
        state
            .entries
            .iter()
            .find(|e| e.item.id == file_id)
            .map_or(0, |e| e.versions)
    }

    fn record(&self, op: Op) {
        self.state.lock().unwrap().ops.push(op);
    }

    fn fails(&self, name: &str) -> bool {
        self.state.lock().unwrap().failing_names.contains(name)
    }
}

async fn read_all(mut content: File) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    content.read_to_end(&mut buf).await?;
    Ok(buf)
}

#[async_trait]
impl BoxApi for FakeBox {
    async fn list_children(&self, folder_id: &str, limit: u32) -> Result<Vec<RemoteItem>> {
        self.record(Op::List {
            folder_id: folder_id.to_string(),
            limit,
        });
        if self.state.lock().unwrap().failing_lists {
            return Err(injected("listing", folder_id));
        }
        let mut children = self.children(folder_id);
        children.truncate(limit as usize);
        Ok(children)
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<RemoteItem> {
        self.record(Op::CreateFolder {
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        if self.fails(name) {
            return Err(injected("folder creation", name));
        }
        let id = self.add_folder(parent_id, name);
        Ok(RemoteItem {
            id,
            name: name.to_string(),
            item_type: ItemType::Folder,
        })
    }

    async fn upload_file(&self, parent_id: &str, name: &str, content: File) -> Result<RemoteItem> {
        self.record(Op::Upload {
            parent_id: parent_id.to_string(),
            name: name.to_string(),
        });
        if self.fails(name) {
            return Err(injected("upload", name));
        }
        if self.child_named(parent_id, name).is_some() {
            return Err(BoxError::Api {
                status: 409,
                code: Some("item_name_in_use".to_string()),
                message: "Item with the same name already exists".to_string(),
            });
        }
        let bytes = read_all(content).await?;
        let id = self.add_file(parent_id, name, &bytes);
        Ok(RemoteItem {
            id,
            name: name.to_string(),
            item_type: ItemType::File,
        })
    }

    async fn upload_new_version(
        &self,
        file_id: &str,
        name: &str,
        content: File,
    ) -> Result<RemoteItem> {
        self.record(Op::NewVersion {
            file_id: file_id.to_string(),
            name: name.to_string(),
        });
        if self.fails(name) {
            return Err(injected("version upload", name));
        }
        let bytes = read_all(content).await?;
        let mut state = self.state.lock().unwrap();
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.item.id == file_id)
            .ok_or_else(|| BoxError::Api {
                status: 404,
                code: Some("not_found".to_string()),
                message: format!("no file {file_id}"),
            })?;
        entry.content = bytes;
        entry.versions += 1;
        Ok(entry.item.clone())
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.record(Op::Delete {
            file_id: file_id.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        if state.failing_deletes {
            return Err(injected("delete", file_id));
        }
        let before = state.entries.len();
        state.entries.retain(|e| e.item.id != file_id);
        if state.entries.len() == before {
            return Err(BoxError::Api {
                status: 404,
                code: Some("not_found".to_string()),
                message: format!("no file {file_id}"),
            });
        }
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &mut File) -> Result<u64> {
        self.record(Op::Download {
            file_id: file_id.to_string(),
        });
        let (name, content) = {
            let state = self.state.lock().unwrap();
            let entry = state
                .entries
                .iter()
                .find(|e| e.item.id == file_id)
                .ok_or_else(|| BoxError::Api {
                    status: 404,
                    code: Some("not_found".to_string()),
                    message: format!("no file {file_id}"),
                })?;
            (entry.item.name.clone(), entry.content.clone())
        };
        if self.fails(&name) {
            return Err(injected("download", &name));
        }
        dest.write_all(&content).await?;
        dest.flush().await?;
        Ok(content.len() as u64)
    }
}
