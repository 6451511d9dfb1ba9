//! A zeptoftp [`FileSystem`] that uses a local directory, like a traditional FTP server.
//!
//! Here is an example for using this storage backend
//!
//! ```no_run
//! use zeptoftp::{ServerBuilder, auth::FtpUser};
//! use zeptoftp_sbe_fs::FtpUserExt;
//!
//! #[tokio::main]
//! pub async fn main() {
//!     let ftp_home = std::env::temp_dir();
//!     let alice = FtpUser::with_fs("alice", "secret", ftp_home).unwrap();
//!     let server = ServerBuilder::new(vec![alice])
//!         .greeting("Welcome to my FTP server")
//!         .build()
//!         .unwrap();
//!
//!     server.listen("127.0.0.1:2121").await.unwrap();
//! }
//! ```

mod ext;
pub use ext::FtpUserExt;

mod cap_fs;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::io::AsyncSeekExt;
use zeptoftp::{
    path::VirtualPath,
    storage::{FileSystem, FileSystemItem, ReadStream, Result, WriteStream},
};

/// The Filesystem struct is an implementation of the [`FileSystem`] trait that keeps its files
/// inside a specific root directory on local disk. Nothing outside of the root can be reached,
/// not even through symlinks.
#[derive(Debug)]
pub struct Filesystem {
    // The Arc is necessary so we can pass it to the blocking tasks.
    root_fd: Arc<cap_std::fs::Dir>,
    root: PathBuf,
}

impl Filesystem {
    /// Create a new Filesystem backend, with the given root. No operations can take place outside
    /// of the root. For example, when the `Filesystem` root is set to `/srv/ftp`, and a client
    /// asks for `hello.txt`, the server will send it `/srv/ftp/hello.txt`.
    pub fn new<P: Into<PathBuf>>(root: P) -> io::Result<Self> {
        let path = root.into();
        let aa = cap_std::ambient_authority();
        let root_fd = Arc::new(cap_std::fs::Dir::open_ambient_dir(&path, aa)?);
        Ok(Filesystem { root_fd, root: path })
    }

    /// The directory this file system serves
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn metadata(&self, path: &VirtualPath) -> io::Result<cap_std::fs::Metadata> {
        cap_fs::metadata(Arc::clone(&self.root_fd), relative(path)).await
    }

    async fn exists(&self, path: &VirtualPath) -> Result<bool> {
        self.metadata(path).await.map(|_| true).or_refused(false)
    }
}

// The virtual path as a path relative to the root directory.
fn relative(path: &VirtualPath) -> PathBuf {
    if path.is_root() {
        PathBuf::from(".")
    } else {
        path.segments().iter().collect()
    }
}

fn to_item(name: &str, meta: &cap_std::fs::Metadata) -> FileSystemItem {
    let modified = meta
        .modified()
        .map(|time| DateTime::<Utc>::from(time.into_std()))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    if meta.is_dir() {
        FileSystemItem::directory(name, modified)
    } else {
        FileSystemItem::file(name, meta.len(), modified)
    }
}

// Errors the client caused, reported as "not found" or "refused" instead of a fault.
fn is_refusal(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound
            | io::ErrorKind::AlreadyExists
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::IsADirectory
            | io::ErrorKind::DirectoryNotEmpty
            | io::ErrorKind::InvalidInput
    )
}

trait OrRefused<T> {
    fn or_refused(self, refused: T) -> Result<T>;
}

impl<T> OrRefused<T> for io::Result<T> {
    fn or_refused(self, refused: T) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) if is_refusal(&err) => Ok(refused),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl FileSystem for Filesystem {
    #[tracing_attributes::instrument]
    async fn item(&self, path: &VirtualPath) -> Result<Option<FileSystemItem>> {
        let name = path.name().unwrap_or("/");
        self.metadata(path).await.map(|meta| Some(to_item(name, &meta))).or_refused(None)
    }

    #[tracing_attributes::instrument]
    async fn list_items(&self, path: &VirtualPath) -> Result<Option<Vec<FileSystemItem>>> {
        let entries = cap_fs::read_dir(Arc::clone(&self.root_fd), relative(path)).await;
        let items = entries.map(|entries| {
            let mut items: Vec<FileSystemItem> = entries.iter().map(|(name, meta)| to_item(name, meta)).collect();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            Some(items)
        });
        items.or_refused(None)
    }

    #[tracing_attributes::instrument]
    async fn file_exists(&self, path: &VirtualPath) -> Result<bool> {
        self.metadata(path).await.map(|meta| meta.is_file()).or_refused(false)
    }

    #[tracing_attributes::instrument]
    async fn directory_exists(&self, path: &VirtualPath) -> Result<bool> {
        self.metadata(path).await.map(|meta| meta.is_dir()).or_refused(false)
    }

    #[tracing_attributes::instrument]
    async fn rename_file(&self, from: &VirtualPath, to: &VirtualPath) -> Result<bool> {
        if !self.file_exists(from).await? || self.exists(to).await? {
            return Ok(false);
        }
        cap_fs::rename(Arc::clone(&self.root_fd), relative(from), relative(to))
            .await
            .map(|()| true)
            .or_refused(false)
    }

    #[tracing_attributes::instrument]
    async fn rename_directory(&self, from: &VirtualPath, to: &VirtualPath) -> Result<bool> {
        if from.is_root() || !self.directory_exists(from).await? || self.exists(to).await? {
            return Ok(false);
        }
        cap_fs::rename(Arc::clone(&self.root_fd), relative(from), relative(to))
            .await
            .map(|()| true)
            .or_refused(false)
    }

    #[tracing_attributes::instrument]
    async fn read_file(&self, path: &VirtualPath) -> Result<Option<ReadStream>> {
        if !self.file_exists(path).await? {
            return Ok(None);
        }
        let Some(file) = cap_fs::open(Arc::clone(&self.root_fd), relative(path)).await.map(Some).or_refused(None)? else {
            return Ok(None);
        };
        Ok(Some(ReadStream::Seekable(Box::new(tokio::fs::File::from_std(file.into_std())))))
    }

    #[tracing_attributes::instrument]
    async fn write_file(&self, path: &VirtualPath) -> Result<Option<WriteStream>> {
        let mut options = cap_std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        let Some(file) = cap_fs::open_with(Arc::clone(&self.root_fd), relative(path), options)
            .await
            .map(Some)
            .or_refused(None)?
        else {
            return Ok(None);
        };
        Ok(Some(WriteStream::Seekable(Box::new(tokio::fs::File::from_std(file.into_std())))))
    }

    #[tracing_attributes::instrument]
    async fn append_file(&self, path: &VirtualPath) -> Result<Option<WriteStream>> {
        let mut options = cap_std::fs::OpenOptions::new();
        options.write(true).create(true);
        let Some(file) = cap_fs::open_with(Arc::clone(&self.root_fd), relative(path), options)
            .await
            .map(Some)
            .or_refused(None)?
        else {
            return Ok(None);
        };
        let mut file = tokio::fs::File::from_std(file.into_std());
        file.seek(io::SeekFrom::End(0)).await?;
        Ok(Some(WriteStream::Seekable(Box::new(file))))
    }

    #[tracing_attributes::instrument]
    async fn remove_file(&self, path: &VirtualPath) -> Result<bool> {
        if !self.file_exists(path).await? {
            return Ok(false);
        }
        cap_fs::remove_file(Arc::clone(&self.root_fd), relative(path))
            .await
            .map(|()| true)
            .or_refused(false)
    }

    #[tracing_attributes::instrument]
    async fn create_directory(&self, path: &VirtualPath) -> Result<bool> {
        if path.is_root() {
            return Ok(false);
        }
        cap_fs::create_dir(Arc::clone(&self.root_fd), relative(path))
            .await
            .map(|()| true)
            .or_refused(false)
    }

    #[tracing_attributes::instrument]
    async fn remove_directory(&self, path: &VirtualPath) -> Result<bool> {
        if path.is_root() {
            return Ok(false);
        }
        cap_fs::remove_dir(Arc::clone(&self.root_fd), relative(path))
            .await
            .map(|()| true)
            .or_refused(false)
    }
}

#[cfg(test)]
mod tests;
