//! Ports through which the copy and sync engines reach the remote service.
//!
//! The engines only ever see `&dyn DbfsApi` / `&dyn WorkspaceApi`; the real
//! clients from `databricks-api` implement them, and tests swap in recording
//! fakes.

use std::path::Path;

use async_trait::async_trait;
use databricks_api::{
    ApiError, DbfsClient, FileInfo, ObjectInfo, WorkspaceClient, WorkspaceFormat,
    WorkspaceLanguage,
};

#[async_trait]
pub trait DbfsApi: Send + Sync {
    async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError>;

    /// Immediate children of `path` only.
    async fn list_files(&self, path: &str) -> Result<Vec<FileInfo>, ApiError>;

    /// Creates `path` and any missing parents; succeeds if it already exists.
    async fn mkdirs(&self, path: &str) -> Result<(), ApiError>;

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError>;

    async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError>;

    async fn put_file(&self, source: &Path, path: &str, overwrite: bool) -> Result<(), ApiError>;

    async fn get_file(&self, path: &str, target: &Path, overwrite: bool) -> Result<(), ApiError>;
}

#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    async fn get_status(&self, path: &str) -> Result<ObjectInfo, ApiError>;

    /// Immediate children of `path` only.
    async fn list_objects(&self, path: &str) -> Result<Vec<ObjectInfo>, ApiError>;

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError>;

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError>;

    async fn export_workspace(
        &self,
        path: &str,
        target: &Path,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError>;

    async fn import_workspace(
        &self,
        source: &Path,
        path: &str,
        language: WorkspaceLanguage,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl DbfsApi for DbfsClient {
    async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError> {
        DbfsClient::get_status(self, path).await
    }

    async fn list_files(&self, path: &str) -> Result<Vec<FileInfo>, ApiError> {
        self.list(path).await
    }

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        DbfsClient::mkdirs(self, path).await
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        DbfsClient::delete(self, path, recursive).await
    }

    async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError> {
        DbfsClient::move_path(self, source, destination).await
    }

    async fn put_file(&self, source: &Path, path: &str, overwrite: bool) -> Result<(), ApiError> {
        DbfsClient::put_file(self, source, path, overwrite).await
    }

    async fn get_file(&self, path: &str, target: &Path, overwrite: bool) -> Result<(), ApiError> {
        DbfsClient::get_file(self, path, target, overwrite).await
    }
}

#[async_trait]
impl WorkspaceApi for WorkspaceClient {
    async fn get_status(&self, path: &str) -> Result<ObjectInfo, ApiError> {
        WorkspaceClient::get_status(self, path).await
    }

    async fn list_objects(&self, path: &str) -> Result<Vec<ObjectInfo>, ApiError> {
        self.list(path).await
    }

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        WorkspaceClient::mkdirs(self, path).await
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        WorkspaceClient::delete(self, path, recursive).await
    }

    async fn export_workspace(
        &self,
        path: &str,
        target: &Path,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        WorkspaceClient::export_workspace(self, path, target, format, overwrite).await
    }

    async fn import_workspace(
        &self,
        source: &Path,
        path: &str,
        language: WorkspaceLanguage,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        WorkspaceClient::import_workspace(self, source, path, language, format, overwrite).await
    }
}
