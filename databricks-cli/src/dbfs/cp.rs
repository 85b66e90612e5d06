use std::io;
use std::path::{Path, PathBuf};

use databricks_api::ApiError;
use thiserror::Error;

use crate::local::{is_local_dir, sorted_children};
use crate::paths::{DbfsPath, PathError};
use crate::remote::DbfsApi;

#[derive(Debug, Error)]
pub enum CpError {
    #[error(
        "Both paths provided are from your local filesystem. To use this utility, one of the src or dst must be prefixed with dbfs:/"
    )]
    BothLocal,
    #[error(
        "Both paths provided are from the DBFS filesystem. To copy between the DBFS filesystem, you currently must copy the file from DBFS to your local filesystem and then back."
    )]
    BothRemote,
    #[error("The local file {} does not exist.", .0.display())]
    LocalNotFound(PathBuf),
    #[error("The local file {} is a directory. You must provide --recursive", .0.display())]
    LocalIsDirectory(PathBuf),
    #[error("The DBFS path {0} is a directory. You must provide --recursive")]
    RemoteIsDirectory(DbfsPath),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpRequest {
    pub source: String,
    pub destination: String,
    pub recursive: bool,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpOutcome {
    Uploaded { files: usize },
    Downloaded { files: usize },
}

/// Copies between the local filesystem and DBFS in whichever direction the
/// arguments describe. Argument problems are reported before any remote call.
pub async fn cp(api: &dyn DbfsApi, request: &CpRequest) -> Result<CpOutcome, CpError> {
    match (
        DbfsPath::is_valid(&request.source),
        DbfsPath::is_valid(&request.destination),
    ) {
        (false, false) => Err(CpError::BothLocal),
        (true, true) => Err(CpError::BothRemote),
        (false, true) => {
            let destination = DbfsPath::parse(&request.destination)?;
            upload(
                api,
                Path::new(&request.source),
                &destination,
                request.recursive,
                request.overwrite,
            )
            .await
        }
        (true, false) => {
            let source = DbfsPath::parse(&request.source)?;
            download(
                api,
                &source,
                Path::new(&request.destination),
                request.recursive,
                request.overwrite,
            )
            .await
        }
    }
}

async fn upload(
    api: &dyn DbfsApi,
    source: &Path,
    destination: &DbfsPath,
    recursive: bool,
    overwrite: bool,
) -> Result<CpOutcome, CpError> {
    let metadata = match tokio::fs::metadata(source).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CpError::LocalNotFound(source.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    if metadata.is_dir() {
        if !recursive {
            return Err(CpError::LocalIsDirectory(source.to_path_buf()));
        }
        let files = upload_dir(api, source, destination, overwrite).await?;
        return Ok(CpOutcome::Uploaded { files });
    }

    // An existing remote directory receives the file under its own name.
    let target = match api.get_status(destination.absolute_path()).await {
        Ok(info) if info.is_dir => destination.join(&local_name(source)),
        Ok(_) => destination.clone(),
        Err(err) if err.is_resource_does_not_exist() => destination.clone(),
        Err(err) => return Err(err.into()),
    };
    tracing::info!(from = %source.display(), to = %target, "uploading");
    api.put_file(source, target.absolute_path(), overwrite).await?;
    Ok(CpOutcome::Uploaded { files: 1 })
}

async fn upload_dir(
    api: &dyn DbfsApi,
    source: &Path,
    destination: &DbfsPath,
    overwrite: bool,
) -> Result<usize, CpError> {
    api.mkdirs(destination.absolute_path()).await?;
    let mut copied = 0;
    for (path, is_dir) in sorted_children(source).await? {
        let target = destination.join(&local_name(&path));
        if is_dir {
            copied += Box::pin(upload_dir(api, &path, &target, overwrite)).await?;
        } else {
            tracing::info!(from = %path.display(), to = %target, "uploading");
            api.put_file(&path, target.absolute_path(), overwrite).await?;
            copied += 1;
        }
    }
    Ok(copied)
}

async fn download(
    api: &dyn DbfsApi,
    source: &DbfsPath,
    destination: &Path,
    recursive: bool,
    overwrite: bool,
) -> Result<CpOutcome, CpError> {
    let info = api.get_status(source.absolute_path()).await?;
    if info.is_dir {
        if !recursive {
            return Err(CpError::RemoteIsDirectory(source.clone()));
        }
        let files = download_dir(api, source, destination, overwrite).await?;
        return Ok(CpOutcome::Downloaded { files });
    }

    let target = if is_local_dir(destination).await {
        destination.join(source.basename())
    } else {
        destination.to_path_buf()
    };
    tracing::info!(from = %source, to = %target.display(), "downloading");
    api.get_file(source.absolute_path(), &target, overwrite).await?;
    Ok(CpOutcome::Downloaded { files: 1 })
}

async fn download_dir(
    api: &dyn DbfsApi,
    source: &DbfsPath,
    destination: &Path,
    overwrite: bool,
) -> Result<usize, CpError> {
    tokio::fs::create_dir_all(destination).await?;
    let mut copied = 0;
    for child in api.list_files(source.absolute_path()).await? {
        let remote = source.join(child.basename());
        let target = destination.join(child.basename());
        if child.is_dir {
            copied += Box::pin(download_dir(api, &remote, &target, overwrite)).await?;
        } else {
            tracing::info!(from = %remote, to = %target.display(), "downloading");
            api.get_file(remote.absolute_path(), &target, overwrite).await?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn local_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
