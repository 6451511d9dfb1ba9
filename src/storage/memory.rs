//! A [`FileSystem`] that keeps everything in memory.
//!
//! Useful for tests, demos and users that only need scratch space. An optional capacity makes
//! writes fail with [`io::ErrorKind::StorageFull`] once the stored bytes would exceed it.

use super::{FileSystem, FileSystemItem, ReadStream, Result, WriteStream};
use crate::path::VirtualPath;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::BTreeMap,
    io::{self, Cursor},
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};
use tokio::io::{AsyncSeek, AsyncWrite};

#[derive(Debug, Clone)]
enum Node {
    Directory { modified: DateTime<Utc> },
    File { content: Vec<u8>, modified: DateTime<Utc> },
}

#[derive(Debug, Default)]
struct Tree {
    // The root directory is implicit and never stored.
    nodes: BTreeMap<VirtualPath, Node>,
    capacity: Option<u64>,
}

impl Tree {
    fn is_directory(&self, path: &VirtualPath) -> bool {
        path.is_root() || matches!(self.nodes.get(path), Some(Node::Directory { .. }))
    }

    fn is_file(&self, path: &VirtualPath) -> bool {
        matches!(self.nodes.get(path), Some(Node::File { .. }))
    }

    fn exists(&self, path: &VirtualPath) -> bool {
        path.is_root() || self.nodes.contains_key(path)
    }

    fn parent_is_directory(&self, path: &VirtualPath) -> bool {
        path.parent().is_some_and(|parent| self.is_directory(&parent))
    }

    fn used(&self) -> u64 {
        self.nodes
            .values()
            .map(|node| match node {
                Node::File { content, .. } => content.len() as u64,
                Node::Directory { .. } => 0,
            })
            .sum()
    }

    fn item(&self, path: &VirtualPath) -> Option<FileSystemItem> {
        let name = path.name().unwrap_or("/");
        if path.is_root() {
            return Some(FileSystemItem::directory(name, DateTime::<Utc>::UNIX_EPOCH));
        }
        self.nodes.get(path).map(|node| match node {
            Node::Directory { modified } => FileSystemItem::directory(name, *modified),
            Node::File { content, modified } => FileSystemItem::file(name, content.len() as u64, *modified),
        })
    }

    fn children(&self, path: &VirtualPath) -> Vec<FileSystemItem> {
        let depth = path.segments().len() + 1;
        self.nodes
            .keys()
            .filter(|candidate| candidate.segments().len() == depth && candidate.starts_with(path))
            .filter_map(|child| self.item(child))
            .collect()
    }

    fn move_subtree(&mut self, from: &VirtualPath, to: &VirtualPath) {
        let moved: Vec<VirtualPath> = self.nodes.keys().filter(|p| p.starts_with(from)).cloned().collect();
        for old in moved {
            if let Some(node) = self.nodes.remove(&old) {
                let mut new = to.clone();
                for segment in &old.segments()[from.segments().len()..] {
                    new.navigate(segment);
                }
                self.nodes.insert(new, node);
            }
        }
    }
}

/// An in-memory [`FileSystem`]. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryFileSystem {
    /// Creates an empty file system without a size limit.
    pub fn new() -> Self {
        MemoryFileSystem::default()
    }

    /// Creates an empty file system that holds at most `bytes` bytes of file content.
    pub fn with_capacity(bytes: u64) -> Self {
        let fs = MemoryFileSystem::default();
        fs.lock().capacity = Some(bytes);
        fs
    }

    /// Stores a file, creating missing parent directories. Returns `false` if the path is the
    /// root, climbs above it or names an existing directory.
    pub fn insert_file<C: Into<Vec<u8>>>(&self, path: &str, content: C, modified: DateTime<Utc>) -> bool {
        let Ok(path) = path.parse::<VirtualPath>() else {
            return false;
        };
        let mut tree = self.lock();
        if path.is_root() || tree.is_directory(&path) {
            return false;
        }
        let mut parent = path.clone();
        while parent.navigate_up() && !parent.is_root() {
            if tree.is_file(&parent) {
                return false;
            }
            tree.nodes.entry(parent.clone()).or_insert(Node::Directory { modified });
        }
        tree.nodes.insert(
            path,
            Node::File {
                content: content.into(),
                modified,
            },
        );
        true
    }

    /// Returns a copy of the content of the file at `path`.
    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        let path = path.parse::<VirtualPath>().ok()?;
        match self.lock().nodes.get(&path) {
            Some(Node::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_for_writing(&self, path: &VirtualPath, truncate: bool) -> Option<WriteStream> {
        let mut tree = self.lock();
        if path.is_root() || tree.is_directory(path) || !tree.parent_is_directory(path) {
            return None;
        }
        let node = tree.nodes.entry(path.clone()).or_insert_with(|| Node::File {
            content: Vec::new(),
            modified: Utc::now(),
        });
        let position = match node {
            Node::File { content, modified } => {
                if truncate {
                    content.clear();
                    *modified = Utc::now();
                }
                content.len() as u64
            }
            Node::Directory { .. } => return None,
        };
        Some(WriteStream::Seekable(Box::new(MemoryFileWriter {
            tree: Arc::clone(&self.tree),
            path: path.clone(),
            position,
        })))
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn item(&self, path: &VirtualPath) -> Result<Option<FileSystemItem>> {
        Ok(self.lock().item(path))
    }

    async fn list_items(&self, path: &VirtualPath) -> Result<Option<Vec<FileSystemItem>>> {
        let tree = self.lock();
        if !tree.is_directory(path) {
            return Ok(None);
        }
        Ok(Some(tree.children(path)))
    }

    async fn file_exists(&self, path: &VirtualPath) -> Result<bool> {
        Ok(self.lock().is_file(path))
    }

    async fn directory_exists(&self, path: &VirtualPath) -> Result<bool> {
        Ok(self.lock().is_directory(path))
    }

    async fn rename_file(&self, from: &VirtualPath, to: &VirtualPath) -> Result<bool> {
        let mut tree = self.lock();
        if !tree.is_file(from) || tree.exists(to) || !tree.parent_is_directory(to) {
            return Ok(false);
        }
        if let Some(node) = tree.nodes.remove(from) {
            tree.nodes.insert(to.clone(), node);
        }
        Ok(true)
    }

    async fn rename_directory(&self, from: &VirtualPath, to: &VirtualPath) -> Result<bool> {
        let mut tree = self.lock();
        if from.is_root() || !tree.is_directory(from) || tree.exists(to) || !tree.parent_is_directory(to) || to.starts_with(from) {
            return Ok(false);
        }
        tree.move_subtree(from, to);
        Ok(true)
    }

    async fn read_file(&self, path: &VirtualPath) -> Result<Option<ReadStream>> {
        match self.lock().nodes.get(path) {
            Some(Node::File { content, .. }) => Ok(Some(ReadStream::Seekable(Box::new(Cursor::new(content.clone()))))),
            _ => Ok(None),
        }
    }

    async fn write_file(&self, path: &VirtualPath) -> Result<Option<WriteStream>> {
        Ok(self.open_for_writing(path, true))
    }

    async fn append_file(&self, path: &VirtualPath) -> Result<Option<WriteStream>> {
        Ok(self.open_for_writing(path, false))
    }

    async fn remove_file(&self, path: &VirtualPath) -> Result<bool> {
        let mut tree = self.lock();
        if !tree.is_file(path) {
            return Ok(false);
        }
        tree.nodes.remove(path);
        Ok(true)
    }

    async fn create_directory(&self, path: &VirtualPath) -> Result<bool> {
        let mut tree = self.lock();
        if tree.exists(path) || !tree.parent_is_directory(path) {
            return Ok(false);
        }
        tree.nodes.insert(path.clone(), Node::Directory { modified: Utc::now() });
        Ok(true)
    }

    async fn remove_directory(&self, path: &VirtualPath) -> Result<bool> {
        let mut tree = self.lock();
        if path.is_root() || !tree.is_directory(path) || !tree.children(path).is_empty() {
            return Ok(false);
        }
        tree.nodes.remove(path);
        Ok(true)
    }
}

// Writes straight into the shared tree so concurrent readers see the data once written.
#[derive(Debug)]
struct MemoryFileWriter {
    tree: Arc<Mutex<Tree>>,
    path: VirtualPath,
    position: u64,
}

impl AsyncWrite for MemoryFileWriter {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let mut tree = this.tree.lock().unwrap_or_else(PoisonError::into_inner);
        let capacity = tree.capacity;
        let used = if capacity.is_some() { tree.used() } else { 0 };
        let Some(Node::File { content, modified }) = tree.nodes.get_mut(&this.path) else {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::NotFound, "file was removed while writing")));
        };
        let start = this.position as usize;
        let Some(end) = start.checked_add(buf.len()) else {
            return Poll::Ready(Err(io::Error::from(io::ErrorKind::FileTooLarge)));
        };
        let growth = end.saturating_sub(content.len()) as u64;
        if capacity.is_some_and(|capacity| used.saturating_add(growth) > capacity) {
            return Poll::Ready(Err(io::Error::from(io::ErrorKind::StorageFull)));
        }
        if content.len() < end {
            content.resize(end, 0);
        }
        content[start..end].copy_from_slice(buf);
        *modified = Utc::now();
        this.position = end as u64;
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for MemoryFileWriter {
    fn start_seek(self: Pin<&mut Self>, position: io::SeekFrom) -> io::Result<()> {
        let this = self.get_mut();
        let len = match this.tree.lock().unwrap_or_else(PoisonError::into_inner).nodes.get(&this.path) {
            Some(Node::File { content, .. }) => content.len() as i64,
            _ => return Err(io::Error::new(io::ErrorKind::NotFound, "file was removed while writing")),
        };
        let target = match position {
            io::SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            io::SeekFrom::End(delta) => len.saturating_add(delta),
            io::SeekFrom::Current(delta) => (this.position as i64).saturating_add(delta),
        };
        if target < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek to a negative position"));
        }
        // Writers never leave holes, a restart has to land inside the existing content.
        if target > len {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek beyond the end of the file"));
        }
        this.position = target as u64;
        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Ok(self.position))
    }
}
