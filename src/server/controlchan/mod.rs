//! Contains code pertaining to the FTP *control* channel

pub(crate) mod codecs;
pub(crate) use codecs::{CommandLine, FtpCodec};

pub(crate) mod reply;
pub(crate) use reply::{Reply, ReplyCode};

pub(crate) mod error;
pub(crate) use error::{ControlChanError, ControlChanErrorKind};

pub(crate) mod handler;
pub(crate) mod middleware;

pub(crate) mod commands;
mod listing;
mod transfer;

pub(crate) mod control_loop;
