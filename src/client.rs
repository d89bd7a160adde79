use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::api::{BoxApi, RemoteItem};
use crate::auth::{self, Credentials};
use crate::error::{BoxError, Result};

// Constants
const API_BASE: &str = "https://api.box.com/2.0";
const UPLOAD_BASE: &str = "https://upload.box.com/api/2.0";
const TOKEN_URL: &str = "https://api.box.com/oauth2/token";

/// Base URLs for the three hosts the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub upload: String,
    pub token: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: API_BASE.to_string(),
            upload: UPLOAD_BASE.to_string(),
            token: TOKEN_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint at one server, the way a mock server is laid out.
    pub fn at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            api: format!("{base}/2.0"),
            upload: format!("{base}/api/2.0"),
            token: format!("{base}/oauth2/token"),
        }
    }
}

// --- STRUCTS ---

#[derive(Deserialize, Debug)]
struct ItemCollection {
    #[serde(default)]
    entries: Vec<RemoteItem>,
    #[serde(default)]
    total_count: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct UploadedFiles {
    #[serde(default)]
    entries: Vec<RemoteItem>,
}

#[derive(Deserialize, Debug, Default)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// --- THE CLIENT ---

/// Box API v2 client holding a bearer token obtained once at construction.
#[derive(Clone)]
pub struct BoxClient {
    client: Client,
    endpoints: Endpoints,
    access_token: String,
}

impl fmt::Debug for BoxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxClient")
            .field("endpoints", &self.endpoints)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl BoxClient {
    /// Builds a client from either kind of credential.
    ///
    /// A developer token is used as-is and only checked by the first request.
    /// A credential bundle is exchanged for an access token right away, so a
    /// bad bundle fails here rather than mid-transfer. The token is never
    /// refreshed.
    pub async fn connect(credentials: Credentials, endpoints: Endpoints) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Some(std::time::Duration::from_secs(90)))
            .build()?;

        let access_token = match credentials {
            Credentials::DeveloperToken(token) => token,
            Credentials::Jwt(config) => {
                auth::request_access_token(&client, &endpoints.token, &config).await?
            }
        };

        Ok(Self {
            client,
            endpoints,
            access_token,
        })
    }

    pub fn with_token(token: impl Into<String>, endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            access_token: token.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.api, path)
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.upload, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.access_token)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .or_else(|| (!body.is_empty()).then(|| body.clone()))
            .unwrap_or_else(|| status.to_string());

        Err(BoxError::Api {
            status: status.as_u16(),
            code: parsed.code,
            message,
        })
    }

    async fn file_part(name: &str, content: File) -> Result<multipart::Part> {
        let size = content.metadata().await?.len();

        // Stream the file instead of buffering it in memory
        let stream = tokio_util::io::ReaderStream::new(content);
        let body = reqwest::Body::wrap_stream(stream);

        multipart::Part::stream_with_length(body, size)
            .file_name(name.to_string())
            .mime_str("application/octet-stream")
            .map_err(BoxError::from)
    }

    async fn send_upload(
        &self,
        url: String,
        attributes: serde_json::Value,
        name: &str,
        content: File,
    ) -> Result<RemoteItem> {
        let part = Self::file_part(name, content).await?;
        // Box requires the attributes part to precede the file part.
        let form = multipart::Form::new()
            .text("attributes", attributes.to_string())
            .part("file", part);

        debug!(%url, name, "uploading");
        let response = self.authorized(self.client.post(&url)).multipart(form).send().await?;
        let uploaded: UploadedFiles = Self::ensure_success(response).await?.json().await?;

        uploaded.entries.into_iter().next().ok_or_else(|| BoxError::Api {
            status: 200,
            code: None,
            message: "upload response contained no file entry".to_string(),
        })
    }
}

#[async_trait]
impl BoxApi for BoxClient {
    async fn list_children(&self, folder_id: &str, limit: u32) -> Result<Vec<RemoteItem>> {
        let url = self.api_url(&format!("folders/{folder_id}/items"));
        let limit = limit.to_string();
        let params = [("limit", limit.as_str()), ("fields", "id,type,name")];

        debug!(folder_id, "listing folder");
        let response = self.authorized(self.client.get(&url)).query(&params).send().await?;
        let listing: ItemCollection = Self::ensure_success(response).await?.json().await?;

        if let Some(total) = listing.total_count {
            if total > listing.entries.len() as u64 {
                warn!(
                    folder_id,
                    total,
                    returned = listing.entries.len(),
                    "folder has more children than one listing page; the rest are not visited"
                );
            }
        }

        Ok(listing.entries)
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<RemoteItem> {
        let url = self.api_url("folders");
        let body = json!({ "name": name, "parent": { "id": parent_id } });

        debug!(name, parent_id, "creating folder");
        let response = self.authorized(self.client.post(&url)).json(&body).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    async fn upload_file(&self, parent_id: &str, name: &str, content: File) -> Result<RemoteItem> {
        let url = self.upload_url("files/content");
        let attributes = json!({ "name": name, "parent": { "id": parent_id } });
        self.send_upload(url, attributes, name, content).await
    }

    async fn upload_new_version(
        &self,
        file_id: &str,
        name: &str,
        content: File,
    ) -> Result<RemoteItem> {
        let url = self.upload_url(&format!("files/{file_id}/content"));
        let attributes = json!({ "name": name });
        self.send_upload(url, attributes, name, content).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let url = self.api_url(&format!("files/{file_id}"));

        debug!(file_id, "deleting file");
        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &mut File) -> Result<u64> {
        let url = self.api_url(&format!("files/{file_id}/content"));

        debug!(file_id, "downloading file");
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::ensure_success(response).await?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let data = chunk?;
            dest.write_all(&data).await?;
            written += data.len() as u64;
        }
        dest.flush().await?;

        Ok(written)
    }
}
