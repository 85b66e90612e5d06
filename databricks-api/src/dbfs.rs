use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::client::{ApiClient, ApiError, Empty, ensure_writable, partial_path};

/// Largest payload the DBFS streaming endpoints accept per call.
pub const BLOCK_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FileInfo {
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub file_size: u64,
}

impl FileInfo {
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Vec<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    handle: i64,
}

#[derive(Debug, Deserialize)]
struct ReadResponse {
    bytes_read: u64,
    #[serde(default)]
    data: String,
}

#[derive(Clone)]
pub struct DbfsClient {
    api: ApiClient,
}

impl DbfsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError> {
        self.api.get("/dbfs/get-status", &[("path", path)]).await
    }

    pub async fn list(&self, path: &str) -> Result<Vec<FileInfo>, ApiError> {
        let response: ListResponse = self.api.get("/dbfs/list", &[("path", path)]).await?;
        Ok(response.files)
    }

    pub async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        let _: Empty = self.api.post("/dbfs/mkdirs", &json!({ "path": path })).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        let _: Empty = self
            .api
            .post(
                "/dbfs/delete",
                &json!({ "path": path, "recursive": recursive }),
            )
            .await?;
        Ok(())
    }

    pub async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError> {
        let _: Empty = self
            .api
            .post(
                "/dbfs/move",
                &json!({ "source_path": source, "destination_path": destination }),
            )
            .await?;
        Ok(())
    }

    pub async fn create(&self, path: &str, overwrite: bool) -> Result<i64, ApiError> {
        let response: CreateResponse = self
            .api
            .post(
                "/dbfs/create",
                &json!({ "path": path, "overwrite": overwrite }),
            )
            .await?;
        Ok(response.handle)
    }

    pub async fn add_block(&self, handle: i64, data: &[u8]) -> Result<(), ApiError> {
        let _: Empty = self
            .api
            .post(
                "/dbfs/add-block",
                &json!({ "handle": handle, "data": STANDARD.encode(data) }),
            )
            .await?;
        Ok(())
    }

    pub async fn close(&self, handle: i64) -> Result<(), ApiError> {
        let _: Empty = self
            .api
            .post("/dbfs/close", &json!({ "handle": handle }))
            .await?;
        Ok(())
    }

    pub async fn read(&self, path: &str, offset: u64, length: u64) -> Result<Vec<u8>, ApiError> {
        let offset = offset.to_string();
        let length = length.to_string();
        let response: ReadResponse = self
            .api
            .get(
                "/dbfs/read",
                &[
                    ("path", path),
                    ("offset", offset.as_str()),
                    ("length", length.as_str()),
                ],
            )
            .await?;
        if response.bytes_read == 0 {
            return Ok(Vec::new());
        }
        Ok(STANDARD.decode(response.data)?)
    }

    /// Streams a local file into DBFS through a create / add-block / close handle.
    pub async fn put_file(
        &self,
        source: &Path,
        path: &str,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        let mut file = tokio::fs::File::open(source).await?;
        let handle = self.create(path, overwrite).await?;
        let mut block = Vec::with_capacity(BLOCK_SIZE);
        loop {
            block.clear();
            (&mut file)
                .take(BLOCK_SIZE as u64)
                .read_to_end(&mut block)
                .await?;
            if block.is_empty() {
                break;
            }
            self.add_block(handle, &block).await?;
        }
        self.close(handle).await
    }

    /// Downloads a DBFS file; the data lands in a `.partial` sibling until complete.
    pub async fn get_file(
        &self,
        path: &str,
        target: &Path,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        ensure_writable(target, overwrite).await?;
        let status = self.get_status(path).await?;
        let partial = partial_path(target);
        let result = self.read_into(path, status.file_size, &partial).await;
        if let Err(err) = result {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err);
        }
        tokio::fs::rename(partial, target).await?;
        Ok(())
    }

    async fn read_into(&self, path: &str, size: u64, partial: &Path) -> Result<(), ApiError> {
        let mut file = tokio::fs::File::create(partial).await?;
        let mut offset = 0u64;
        while offset < size {
            let chunk = self.read(path, offset, BLOCK_SIZE as u64).await?;
            if chunk.is_empty() {
                break;
            }
            file.write_all(&chunk).await?;
            offset += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

pub(crate) fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
