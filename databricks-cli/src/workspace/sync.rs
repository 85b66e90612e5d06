use std::io;
use std::path::{Path, PathBuf};

use databricks_api::{ApiError, ObjectType, WorkspaceFormat, WorkspaceLanguage};
use thiserror::Error;

use crate::local::sorted_children;
use crate::paths::join_remote;
use crate::remote::WorkspaceApi;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{} exists and is not a directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error(
        "{} does not have a valid extension of {}.",
        .0.display(),
        WorkspaceLanguage::supported_extensions()
    )]
    UnsupportedExtension(PathBuf),
    #[error("{} is a directory. Use import_dir instead.", .0.display())]
    IsDirectory(PathBuf),
    #[error("The source path {0} is not a notebook. Use export_dir for directories.")]
    NotANotebook(String),
}

/// What a directory sync touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Directories visited, the root included.
    pub directories: usize,
    /// Notebooks exported or imported.
    pub notebooks: usize,
    /// Entries left alone: local files without a notebook extension, or remote
    /// objects that are not notebooks.
    pub skipped: Vec<String>,
}

/// Mirrors the workspace tree under `remote_root` into `local_root`.
///
/// Every visited remote directory is listed exactly once, and its local
/// counterpart exists before any notebook is written into it. Siblings are
/// processed in listing order.
pub async fn export_dir(
    api: &dyn WorkspaceApi,
    remote_root: &str,
    local_root: &Path,
    overwrite: bool,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();
    export_dir_into(api, remote_root, local_root, overwrite, &mut report).await?;
    Ok(report)
}

async fn export_dir_into(
    api: &dyn WorkspaceApi,
    remote_root: &str,
    local_root: &Path,
    overwrite: bool,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    ensure_local_dir(local_root).await?;
    report.directories += 1;

    for object in api.list_objects(remote_root).await? {
        match (object.object_type, object.language) {
            (ObjectType::Directory, _) => {
                let target = local_root.join(object.basename());
                Box::pin(export_dir_into(
                    api,
                    &object.path,
                    &target,
                    overwrite,
                    report,
                ))
                .await?;
            }
            (ObjectType::Notebook, Some(language)) => {
                let target =
                    local_root.join(format!("{}{}", object.basename(), language.extension()));
                api.export_workspace(&object.path, &target, WorkspaceFormat::Source, overwrite)
                    .await?;
                tracing::info!(from = %object.path, to = %target.display(), "exported");
                report.notebooks += 1;
            }
            (object_type, _) => {
                tracing::warn!(path = %object.path, ?object_type, "skipping object that cannot be exported as source");
                report.skipped.push(object.path);
            }
        }
    }
    Ok(())
}

/// Mirrors the local tree under `local_root` into the workspace at `remote_root`.
///
/// `mkdirs` is issued once per visited directory, the root included. Files
/// whose extension maps to no notebook language are skipped and reported.
/// Local siblings are processed in file-name order.
pub async fn import_dir(
    api: &dyn WorkspaceApi,
    local_root: &Path,
    remote_root: &str,
    overwrite: bool,
) -> Result<SyncReport, SyncError> {
    if !tokio::fs::metadata(local_root).await?.is_dir() {
        return Err(SyncError::NotADirectory(local_root.to_path_buf()));
    }
    let mut report = SyncReport::default();
    import_dir_into(api, local_root, remote_root, overwrite, &mut report).await?;
    Ok(report)
}

async fn import_dir_into(
    api: &dyn WorkspaceApi,
    local_root: &Path,
    remote_root: &str,
    overwrite: bool,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    api.mkdirs(remote_root).await?;
    report.directories += 1;

    for (path, is_dir) in sorted_children(local_root).await? {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
            continue;
        };
        if is_dir {
            let target = join_remote(remote_root, &name);
            Box::pin(import_dir_into(api, &path, &target, overwrite, report)).await?;
            continue;
        }

        let Some(language) = WorkspaceLanguage::from_path(&path) else {
            tracing::warn!(
                "{} does not have a valid extension of {}. Skip this file and continue.",
                path.display(),
                WorkspaceLanguage::supported_extensions()
            );
            report.skipped.push(path.display().to_string());
            continue;
        };
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(name);
        let target = join_remote(remote_root, &stem);
        api.import_workspace(&path, &target, language, WorkspaceFormat::Source, overwrite).await?;
        tracing::info!(from = %path.display(), to = %target, %language, "imported");
        report.notebooks += 1;
    }
    Ok(())
}

async fn ensure_local_dir(path: &Path) -> Result<(), SyncError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(SyncError::NotADirectory(path.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tokio::fs::create_dir_all(path).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
