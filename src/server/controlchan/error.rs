//! Contains the `ControlChanError` struct that that defines the control channel error type.

use crate::{BoxError, storage};
use derive_more::Display;
use std::io;
use thiserror::Error;

/// The error type commands and the control loop return.
#[derive(Debug, Error)]
#[error("control channel error: {kind}")]
pub struct ControlChanError {
    kind: ControlChanErrorKind,
    #[source]
    source: Option<BoxError>,
}

/// A list specifying categories of control channel errors. It is meant to be used with the
/// [ControlChanError] type.
#[derive(Eq, PartialEq, Debug, Display, Clone, Copy)]
pub enum ControlChanErrorKind {
    /// Reading from or writing to the control connection failed. The session cannot continue.
    #[display("Failed to perform IO on the control channel")]
    ControlChannelIo,
    /// Moving bytes between the data connection and storage failed.
    #[display("Failed to transfer data")]
    DataTransfer,
    /// The storage back-end reported a fault.
    #[display("Storage back-end failure")]
    Storage,
    /// Internal Server Error. This is probably a bug.
    #[display("Internal Server Error")]
    InternalServerError,
}

impl ControlChanError {
    /// Creates a new control channel error with the specific kind
    pub fn new(kind: ControlChanErrorKind) -> Self {
        ControlChanError { kind, source: None }
    }

    /// Creates a new control channel error of the given kind wrapping `source`
    pub fn with_source<E: Into<BoxError>>(kind: ControlChanErrorKind, source: E) -> Self {
        ControlChanError {
            kind,
            source: Some(source.into()),
        }
    }

    /// Wraps an error that happened while copying to or from the data connection
    pub fn data_transfer(err: io::Error) -> Self {
        ControlChanError::with_source(ControlChanErrorKind::DataTransfer, err)
    }

    /// Return the inner error kind of this error.
    pub fn kind(&self) -> ControlChanErrorKind {
        self.kind
    }

    /// Returns `true` if the control connection itself broke and the session has to end.
    pub fn is_fatal(&self) -> bool {
        self.kind == ControlChanErrorKind::ControlChannelIo
    }
}

impl From<ControlChanErrorKind> for ControlChanError {
    fn from(kind: ControlChanErrorKind) -> ControlChanError {
        ControlChanError::new(kind)
    }
}

// The codec requires this conversion. Only control connection IO goes through it.
impl From<io::Error> for ControlChanError {
    fn from(err: io::Error) -> ControlChanError {
        ControlChanError::with_source(ControlChanErrorKind::ControlChannelIo, err)
    }
}

impl From<storage::Error> for ControlChanError {
    fn from(err: storage::Error) -> ControlChanError {
        ControlChanError::with_source(ControlChanErrorKind::Storage, err)
    }
}
