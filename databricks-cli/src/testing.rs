//! Recording fakes of the remote ports.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use databricks_api::{
    ApiError, ErrorCode, FileInfo, ObjectInfo, StatusCode, WorkspaceFormat, WorkspaceLanguage,
};

use crate::remote::{DbfsApi, WorkspaceApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetStatus(String),
    List(String),
    Mkdirs(String),
    Delete(String, bool),
    Move(String, String),
    Put(PathBuf, String, bool),
    Get(String, PathBuf, bool),
    Export(String, PathBuf, WorkspaceFormat, bool),
    Import(PathBuf, String, WorkspaceLanguage, WorkspaceFormat, bool),
}

pub fn not_found(path: &str) -> ApiError {
    ApiError::Api {
        status: StatusCode::NOT_FOUND,
        error_code: Some(ErrorCode::ResourceDoesNotExist),
        message: format!("No file or directory exists on path {path}."),
    }
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct FakeDbfs {
    recorder: Recorder,
    statuses: HashMap<String, FileInfo>,
    listings: HashMap<String, Vec<FileInfo>>,
    status_error: Option<fn() -> ApiError>,
}

impl FakeDbfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, size: u64) -> Self {
        self.statuses.insert(
            path.to_string(),
            FileInfo {
                path: path.to_string(),
                is_dir: false,
                file_size: size,
            },
        );
        self
    }

    pub fn with_dir(mut self, path: &str, children: Vec<FileInfo>) -> Self {
        self.statuses.insert(
            path.to_string(),
            FileInfo {
                path: path.to_string(),
                is_dir: true,
                file_size: 0,
            },
        );
        self.listings.insert(path.to_string(), children);
        self
    }

    /// Every status lookup fails with the given error.
    pub fn with_status_error(mut self, error: fn() -> ApiError) -> Self {
        self.status_error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.calls()
    }
}

#[async_trait]
impl DbfsApi for FakeDbfs {
    async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError> {
        self.recorder.record(Call::GetStatus(path.to_string()));
        if let Some(error) = self.status_error {
            return Err(error());
        }
        self.statuses.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn list_files(&self, path: &str) -> Result<Vec<FileInfo>, ApiError> {
        self.recorder.record(Call::List(path.to_string()));
        self.listings.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        self.recorder.record(Call::Mkdirs(path.to_string()));
        Ok(())
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        self.recorder.record(Call::Delete(path.to_string(), recursive));
        Ok(())
    }

    async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError> {
        self.recorder
            .record(Call::Move(source.to_string(), destination.to_string()));
        Ok(())
    }

    async fn put_file(&self, source: &Path, path: &str, overwrite: bool) -> Result<(), ApiError> {
        self.recorder
            .record(Call::Put(source.to_path_buf(), path.to_string(), overwrite));
        Ok(())
    }

    async fn get_file(&self, path: &str, target: &Path, overwrite: bool) -> Result<(), ApiError> {
        self.recorder
            .record(Call::Get(path.to_string(), target.to_path_buf(), overwrite));
        tokio::fs::write(target, format!("dbfs:{path}")).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeWorkspace {
    recorder: Recorder,
    listings: HashMap<String, Vec<ObjectInfo>>,
    statuses: HashMap<String, ObjectInfo>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, path: &str, objects: Vec<ObjectInfo>) -> Self {
        for object in &objects {
            self.statuses.insert(object.path.clone(), object.clone());
        }
        self.listings.insert(path.to_string(), objects);
        self
    }

    pub fn with_object(mut self, object: ObjectInfo) -> Self {
        self.statuses.insert(object.path.clone(), object);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.calls()
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::List(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn mkdirs_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Mkdirs(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn export_calls(&self) -> Vec<(String, PathBuf)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Export(path, target, _, _) => Some((path, target)),
                _ => None,
            })
            .collect()
    }

    pub fn import_calls(&self) -> Vec<(PathBuf, String, WorkspaceLanguage)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Import(source, path, language, _, _) => Some((source, path, language)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl WorkspaceApi for FakeWorkspace {
    async fn get_status(&self, path: &str) -> Result<ObjectInfo, ApiError> {
        self.recorder.record(Call::GetStatus(path.to_string()));
        self.statuses.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn list_objects(&self, path: &str) -> Result<Vec<ObjectInfo>, ApiError> {
        self.recorder.record(Call::List(path.to_string()));
        self.listings.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        self.recorder.record(Call::Mkdirs(path.to_string()));
        Ok(())
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        self.recorder.record(Call::Delete(path.to_string(), recursive));
        Ok(())
    }

    async fn export_workspace(
        &self,
        path: &str,
        target: &Path,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        self.recorder.record(Call::Export(
            path.to_string(),
            target.to_path_buf(),
            format,
            overwrite,
        ));
        tokio::fs::write(target, format!("// {path}")).await?;
        Ok(())
    }

    async fn import_workspace(
        &self,
        source: &Path,
        path: &str,
        language: WorkspaceLanguage,
        format: WorkspaceFormat,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        self.recorder.record(Call::Import(
            source.to_path_buf(),
            path.to_string(),
            language,
            format,
            overwrite,
        ));
        Ok(())
    }
}
