use std::io;
use std::path::{Path, PathBuf};

pub(crate) async fn is_local_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

/// Children of a local directory sorted by file name, each paired with whether
/// it is a directory. Symlinks are followed.
pub(crate) async fn sorted_children(dir: &Path) -> io::Result<Vec<(PathBuf, bool)>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_dir = tokio::fs::metadata(&path).await?.is_dir();
        children.push((path, is_dir));
    }
    children.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(children)
}
