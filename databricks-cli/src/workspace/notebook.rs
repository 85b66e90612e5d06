use std::path::{Path, PathBuf};

use databricks_api::{WorkspaceFormat, WorkspaceLanguage};

use crate::local::is_local_dir;
use crate::remote::WorkspaceApi;
use crate::workspace::SyncError;

/// Exports one notebook. Directories are rejected; when `target` is an existing
/// local directory the file is named after the notebook plus the extension of
/// the chosen format.
pub async fn export_notebook(
    api: &dyn WorkspaceApi,
    source: &str,
    target: &Path,
    format: WorkspaceFormat,
    overwrite: bool,
) -> Result<PathBuf, SyncError> {
    let info = api.get_status(source).await?;
    if info.is_dir() {
        return Err(SyncError::NotANotebook(source.to_string()));
    }
    let target = if is_local_dir(target).await {
        let language = info
            .language
            .filter(|_| info.is_notebook())
            .ok_or_else(|| SyncError::NotANotebook(source.to_string()))?;
        target.join(format!(
            "{}{}",
            info.basename(),
            export_extension(format, language)
        ))
    } else {
        target.to_path_buf()
    };
    api.export_workspace(source, &target, format, overwrite).await?;
    Ok(target)
}

/// Imports one local file. Without an explicit language the file extension decides.
pub async fn import_notebook(
    api: &dyn WorkspaceApi,
    source: &Path,
    target: &str,
    language: Option<WorkspaceLanguage>,
    format: WorkspaceFormat,
    overwrite: bool,
) -> Result<WorkspaceLanguage, SyncError> {
    if tokio::fs::metadata(source).await?.is_dir() {
        return Err(SyncError::IsDirectory(source.to_path_buf()));
    }
    let language = language
        .or_else(|| WorkspaceLanguage::from_path(source))
        .ok_or_else(|| SyncError::UnsupportedExtension(source.to_path_buf()))?;
    api.import_workspace(source, target, language, format, overwrite).await?;
    Ok(language)
}

fn export_extension(format: WorkspaceFormat, language: WorkspaceLanguage) -> &'static str {
    match format {
        WorkspaceFormat::Source => language.extension(),
        WorkspaceFormat::Html => ".html",
        WorkspaceFormat::Jupyter => ".ipynb",
        WorkspaceFormat::Dbc => ".dbc",
    }
}
