//! Contains the [`FileSystem`] trait commands operate on, the types that flow through it and an
//! in-memory implementation.
//!
//! A file system reports "not found" or "refused" outcomes as `None` or `false`. Only genuine
//! faults come back as an [`Error`].

mod error;
pub use error::{Error, ErrorKind};

pub mod memory;
pub use memory::MemoryFileSystem;

use crate::path::VirtualPath;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    fmt::Debug,
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, ReadBuf};

/// Result type used by [`FileSystem`] implementations
pub type Result<T> = std::result::Result<T, Error>;

/// Metadata of a file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemItem {
    /// The last path segment, `/` for the root
    pub name: String,
    /// Whether this is a directory
    pub is_directory: bool,
    /// Size in bytes, zero for directories
    pub size: u64,
    /// The last modification time
    pub modified: DateTime<Utc>,
}

impl FileSystemItem {
    /// Describes a file
    pub fn file<N: Into<String>>(name: N, size: u64, modified: DateTime<Utc>) -> Self {
        FileSystemItem {
            name: name.into(),
            is_directory: false,
            size,
            modified,
        }
    }

    /// Describes a directory
    pub fn directory<N: Into<String>>(name: N, modified: DateTime<Utc>) -> Self {
        FileSystemItem {
            name: name.into(),
            is_directory: true,
            size: 0,
            modified,
        }
    }
}

/// A reader that can also seek.
pub trait AsyncReadSeek: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> AsyncReadSeek for T {}

/// A writer that can also seek.
pub trait AsyncWriteSeek: AsyncWrite + AsyncSeek + Send + Unpin {}

impl<T: AsyncWrite + AsyncSeek + Send + Unpin> AsyncWriteSeek for T {}

/// A file opened for reading.
pub enum ReadStream {
    /// Supports positioning, restarts seek directly.
    Seekable(Box<dyn AsyncReadSeek>),
    /// Can only be read front to back, restarts read and discard the skipped bytes.
    Sequential(Box<dyn AsyncRead + Send + Unpin>),
}

impl Debug for ReadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadStream::Seekable(_) => f.write_str("ReadStream::Seekable"),
            ReadStream::Sequential(_) => f.write_str("ReadStream::Sequential"),
        }
    }
}

impl ReadStream {
    /// Positions the stream at `offset` bytes from the start.
    pub async fn skip_to(&mut self, offset: u64) -> io::Result<()> {
        match self {
            ReadStream::Seekable(reader) => {
                reader.seek(io::SeekFrom::Start(offset)).await?;
            }
            ReadStream::Sequential(reader) => {
                let mut skipped_part = reader.take(offset);
                let skipped = tokio::io::copy(&mut skipped_part, &mut tokio::io::sink()).await?;
                if skipped < offset {
                    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "offset lies beyond the end of the file"));
                }
            }
        }
        Ok(())
    }
}

impl AsyncRead for ReadStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ReadStream::Seekable(reader) => Pin::new(reader).poll_read(cx, buf),
            ReadStream::Sequential(reader) => Pin::new(reader).poll_read(cx, buf),
        }
    }
}

/// A file opened for writing or appending.
pub enum WriteStream {
    /// Supports positioning, so restarts can overwrite from an offset.
    Seekable(Box<dyn AsyncWriteSeek>),
    /// Can only be written front to back. Restarts at a non-zero offset are refused.
    Sequential(Box<dyn AsyncWrite + Send + Unpin>),
}

impl Debug for WriteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteStream::Seekable(_) => f.write_str("WriteStream::Seekable"),
            WriteStream::Sequential(_) => f.write_str("WriteStream::Sequential"),
        }
    }
}

impl WriteStream {
    /// Positions the stream at `offset` bytes from the start.
    pub async fn skip_to(&mut self, offset: u64) -> io::Result<()> {
        match self {
            WriteStream::Seekable(writer) => {
                writer.seek(io::SeekFrom::Start(offset)).await?;
                Ok(())
            }
            WriteStream::Sequential(_) if offset == 0 => Ok(()),
            WriteStream::Sequential(_) => Err(io::Error::new(io::ErrorKind::Unsupported, "stream cannot be positioned")),
        }
    }
}

impl AsyncWrite for WriteStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            WriteStream::Seekable(writer) => Pin::new(writer).poll_write(cx, buf),
            WriteStream::Sequential(writer) => Pin::new(writer).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            WriteStream::Seekable(writer) => Pin::new(writer).poll_flush(cx),
            WriteStream::Sequential(writer) => Pin::new(writer).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            WriteStream::Seekable(writer) => Pin::new(writer).poll_shutdown(cx),
            WriteStream::Sequential(writer) => Pin::new(writer).poll_shutdown(cx),
        }
    }
}

/// The file system a logged in user works on.
///
/// Every operation takes a [`VirtualPath`] that the session already resolved against the
/// user's current directory. Implementations map it onto their own storage.
#[async_trait]
pub trait FileSystem: Send + Sync + Debug {
    /// Returns the metadata of the file or directory at `path`.
    async fn item(&self, path: &VirtualPath) -> Result<Option<FileSystemItem>>;

    /// Lists the contents of the directory at `path`. Returns `None` if there is no such
    /// directory.
    async fn list_items(&self, path: &VirtualPath) -> Result<Option<Vec<FileSystemItem>>>;

    /// Returns `true` if a file exists at `path`.
    async fn file_exists(&self, path: &VirtualPath) -> Result<bool>;

    /// Returns `true` if a directory exists at `path`.
    async fn directory_exists(&self, path: &VirtualPath) -> Result<bool>;

    /// Renames the file at `from` to `to`.
    async fn rename_file(&self, from: &VirtualPath, to: &VirtualPath) -> Result<bool>;

    /// Renames the directory at `from` to `to`.
    async fn rename_directory(&self, from: &VirtualPath, to: &VirtualPath) -> Result<bool>;

    /// Opens the file at `path` for reading.
    async fn read_file(&self, path: &VirtualPath) -> Result<Option<ReadStream>>;

    /// Creates or truncates the file at `path` and opens it for writing.
    async fn write_file(&self, path: &VirtualPath) -> Result<Option<WriteStream>>;

    /// Opens the file at `path` for writing at its end, creating it if needed.
    async fn append_file(&self, path: &VirtualPath) -> Result<Option<WriteStream>>;

    /// Removes the file at `path`.
    async fn remove_file(&self, path: &VirtualPath) -> Result<bool>;

    /// Creates a directory at `path`. The parent must exist.
    async fn create_directory(&self, path: &VirtualPath) -> Result<bool>;

    /// Removes the empty directory at `path`.
    async fn remove_directory(&self, path: &VirtualPath) -> Result<bool>;
}
