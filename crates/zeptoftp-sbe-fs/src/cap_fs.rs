//! A capabilities-friendly workalike of the parts of tokio::fs the back-end needs. Every call runs
//! the blocking cap_std operation on tokio's blocking pool.

use std::{io, path::PathBuf, sync::Arc};
use tokio::task::spawn_blocking;

type Root = Arc<cap_std::fs::Dir>;

/// Exact copy of tokio::fs::asyncify
async fn asyncify<F, T>(f: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match spawn_blocking(f).await {
        Ok(res) => res,
        Err(_) => Err(io::Error::other("background task failed")),
    }
}

/// Queries the metadata of a path, following symlinks that stay inside the root.
pub async fn metadata(root: Root, path: PathBuf) -> io::Result<cap_std::fs::Metadata> {
    asyncify(move || root.metadata(path)).await
}

/// Reads all entries of a directory together with their metadata.
pub async fn read_dir(root: Root, path: PathBuf) -> io::Result<Vec<(String, cap_std::fs::Metadata)>> {
    asyncify(move || {
        let mut entries = Vec::new();
        for entry in root.read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            entries.push((entry.file_name().to_string_lossy().into_owned(), metadata));
        }
        Ok(entries)
    })
    .await
}

pub async fn open(root: Root, path: PathBuf) -> io::Result<cap_std::fs::File> {
    asyncify(move || root.open(path)).await
}

pub async fn open_with(root: Root, path: PathBuf, options: cap_std::fs::OpenOptions) -> io::Result<cap_std::fs::File> {
    asyncify(move || root.open_with(path, &options)).await
}

/// Create a new directory somewhere under the root
pub async fn create_dir(root: Root, path: PathBuf) -> io::Result<()> {
    asyncify(move || root.create_dir(path)).await
}

/// Removes an existing, empty directory.
pub async fn remove_dir(root: Root, path: PathBuf) -> io::Result<()> {
    asyncify(move || root.remove_dir(path)).await
}

/// Removes a file from the filesystem.
///
/// Note that there is no guarantee that the file is immediately deleted (e.g.
/// depending on platform, other open file descriptors may prevent immediate
/// removal).
pub async fn remove_file(root: Root, path: PathBuf) -> io::Result<()> {
    asyncify(move || root.remove_file(path)).await
}

/// Renames a file or directory to a new name, replacing the original file if
/// `to` already exists.
///
/// This will not work if the new name is on a different mount point.
pub async fn rename(root: Root, from: PathBuf, to: PathBuf) -> io::Result<()> {
    asyncify(move || root.rename(from, &root, to)).await
}
