use crate::BoxError;
use derive_more::Display;
use std::io;
use thiserror::Error;

/// The Error returned by [`FileSystem`](super::FileSystem) implementations for faults that are
/// not a plain "not found" or "refused". The kind decides how the command reports it to the
/// client.
#[derive(Debug, Error)]
#[error("storage error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates a new storage error
    pub fn new<E>(kind: ErrorKind, error: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: Some(error.into()),
        }
    }

    /// Detailed information about what the FTP server should do with the failure
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Attempts to get a reference to the inner `std::io::Error` if there is one.
    pub fn get_io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()?.downcast_ref::<io::Error>()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::PermanentFileNotAvailable,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            io::ErrorKind::StorageFull => ErrorKind::InsufficientStorageSpace,
            _ => ErrorKind::LocalError,
        };
        Error::new(kind, err)
    }
}

/// The `ErrorKind` variants that can be produced by [`FileSystem`](super::FileSystem)
/// implementations.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// The file or directory does not exist or cannot be used.
    #[display("550 Permanent file not available")]
    PermanentFileNotAvailable,
    /// Access to the file or directory was denied.
    #[display("550 Permission denied")]
    PermissionDenied,
    /// The storage ran out of space or the quota was exceeded. Reported to the client as a 552.
    #[display("552 Insufficient storage space")]
    InsufficientStorageSpace,
    /// Any other failure inside the storage back-end.
    #[display("451 Local error")]
    LocalError,
}
