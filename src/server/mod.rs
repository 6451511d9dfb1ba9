//! Contains the [`Server`] that is used to configure and run a FTP server instance, together
//! with the control channel, data channel and session machinery behind it.

pub(crate) mod controlchan;
pub(crate) mod datachan;
mod ftpserver;
pub(crate) mod session;
mod stream;

pub use ftpserver::{Server, ServerBuilder, error::ServerError, options};
