use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ApiClient, ApiError, Empty, ensure_writable, partial_path};
use crate::dbfs::basename;
use crate::language::{WorkspaceFormat, WorkspaceLanguage};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectType {
    Directory,
    Notebook,
    Library,
    /// Repos, plain files and any type added later.
    #[serde(other)]
    Other,
}

/// One object of the workspace namespace. `language` is only set for notebooks.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ObjectInfo {
    pub path: String,
    pub object_type: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<WorkspaceLanguage>,
}

impl ObjectInfo {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            object_type: ObjectType::Directory,
            language: None,
        }
    }

    pub fn notebook(path: impl Into<String>, language: WorkspaceLanguage) -> Self {
        Self {
            path: path.into(),
            object_type: ObjectType::Notebook,
            language: Some(language),
        }
    }

    pub fn basename(&self) -> &str {
        basename(&self.path)
    }

    pub fn is_dir(&self) -> bool {
        self.object_type == ObjectType::Directory
    }

    pub fn is_notebook(&self) -> bool {
        self.object_type == ObjectType::Notebook
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    objects: Vec<ObjectInfo>,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    content: String,
}

#[derive(Debug, Serialize)]
struct ImportRequest<'a> {
    path: &'a str,
    format: WorkspaceFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<WorkspaceLanguage>,
    content: String,
    overwrite: bool,
}

#[derive(Clone)]
pub struct WorkspaceClient {
    api: ApiClient,
}

impl WorkspaceClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_status(&self, path: &str) -> Result<ObjectInfo, ApiError> {
        self.api
            .get("/workspace/get-status", &[("path", path)])
            .await
    }

    pub async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>, ApiError> {
        let response: ListResponse = self.api.get("/workspace/list", &[("path", path)]).await?;
        Ok(response.objects)
    }

    pub async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        let _: Empty = self
            .api
            .post("/workspace/mkdirs", &json!({ "path": path }))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        let _: Empty = self
            .api
            .post(
                "/workspace/delete",
                &json!({ "path": path, "recursive": recursive }),
            )
            .await?;
        Ok(())
    }

    pub async fn export(&self, path: &str, format: WorkspaceFormat) -> Result<Vec<u8>, ApiError> {
        let response: ExportResponse = self
            .api
            .get(
                "/workspace/export",
                &[("path", path), ("format", format.as_str())],
            )
            .await?;
        Ok(STANDARD.decode(response.content)?)
    }

    pub async fn import(
        &self,
        path: &str,
        format: WorkspaceFormat,
        language: Option<WorkspaceLanguage>,
        content: &[u8],
        overwrite: bool,
    ) -> Result<(), ApiError> {
        let request = ImportRequest {
            path,
            format,
            language,
            content: STANDARD.encode(content),
            overwrite,
        };
        let _: Empty = self.api.post("/workspace/import", &request).await?;
        Ok(())
    }

    pub async fn export_workspace(
        &self,
        path: &str,
        target: &Path,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        ensure_writable(target, overwrite).await?;
        let content = self.export(path, format).await?;
        let partial = partial_path(target);
        tokio::fs::write(&partial, content).await?;
        tokio::fs::rename(partial, target).await?;
        Ok(())
    }

    pub async fn import_workspace(
        &self,
        source: &Path,
        path: &str,
        language: WorkspaceLanguage,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        let content = tokio::fs::read(source).await?;
        self.import(path, format, Some(language), &content, overwrite)
            .await
    }
}
