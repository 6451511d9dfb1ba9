//! zeptoftp is a small, async FTP server library.
//!
//! It implements the RFC 959 command set most clients need (plus the FEAT, OPTS UTF8, SIZE, MDTM
//! and REST STREAM extensions) on top of a line-oriented control channel engine. Files are served
//! from a [`FileSystem`](storage::FileSystem) implementation of your choice. An in-memory one
//! ships with this crate and the `zeptoftp-sbe-fs` crate serves files from local disk.
//!
//! ```no_run
//! use zeptoftp::{ServerBuilder, auth::FtpUser, storage::MemoryFileSystem};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! pub async fn main() {
//!     let alice = FtpUser::new("alice", "secret", Arc::new(MemoryFileSystem::new()));
//!     let server = ServerBuilder::new(vec![alice])
//!         .greeting("Welcome to my FTP server")
//!         .build()
//!         .unwrap();
//!
//!     server.listen("127.0.0.1:2121").await.unwrap();
//! }
//! ```

pub mod auth;
pub mod buffer;
pub mod encoding;
pub mod path;
mod server;
pub mod storage;

#[cfg(feature = "prometheus")]
mod metrics;

pub use crate::server::{Server, ServerBuilder, ServerError, options};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
