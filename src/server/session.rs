//! The per connection session state.

use crate::{
    auth::Accounts,
    encoding::TextEncoding,
    path::VirtualPath,
    server::{
        controlchan::{ControlChanError, ControlChanErrorKind},
        datachan::{DataChanOptions, DataChannel},
    },
    storage::FileSystem,
};
use bytes::Bytes;
use derive_more::Display;
use std::{fmt, net::IpAddr, sync::Arc};

/// The representation type set with `TYPE`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TransferType {
    #[default]
    #[display("ASCII")]
    Ascii,
    #[display("Image")]
    Image,
}

/// The transfer mode set with `MODE`. Only stream mode exists.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TransferMode {
    #[default]
    Stream,
}

// This is where we keep the state for a ftp session. It is owned by the connection's control
// loop, commands get it by mutable reference.
pub(crate) struct Session {
    pub accounts: Arc<Accounts>,
    // The local address of the control connection, passive listeners bind to it.
    pub bind_address: IpAddr,
    // The address advertised in PASV replies.
    pub public_address: IpAddr,
    pub control_encoding: TextEncoding,
    pub path_encoding: TextEncoding,
    pub line_terminator: Bytes,
    pub username: Option<String>,
    // Set exactly when a user is logged in.
    pub filesystem: Option<Arc<dyn FileSystem>>,
    pub cwd: VirtualPath,
    pub rename_from: Option<VirtualPath>,
    pub restart_offset: u64,
    pub transfer_type: TransferType,
    pub transfer_mode: TransferMode,
    pub data_channel: Option<DataChannel>,
    pub data_chan_options: DataChanOptions,
    pub collect_metrics: bool,
    // Set by QUIT, the control loop ends the session after the reply went out.
    pub closing: bool,
}

impl Session {
    pub(crate) fn new(accounts: Arc<Accounts>, bind_address: IpAddr, public_address: IpAddr) -> Self {
        Session {
            accounts,
            bind_address,
            public_address,
            control_encoding: TextEncoding::Ascii,
            path_encoding: TextEncoding::Ascii,
            line_terminator: Bytes::from_static(b"\r\n"),
            username: None,
            filesystem: None,
            cwd: VirtualPath::root(),
            rename_from: None,
            restart_offset: 0,
            transfer_type: TransferType::default(),
            transfer_mode: TransferMode::default(),
            data_channel: None,
            data_chan_options: DataChanOptions::default(),
            collect_metrics: false,
            closing: false,
        }
    }

    pub(crate) fn line_terminator(mut self, line_terminator: Bytes) -> Self {
        self.line_terminator = line_terminator;
        self
    }

    pub(crate) fn data_chan_options(mut self, options: DataChanOptions) -> Self {
        self.data_chan_options = options;
        self
    }

    pub(crate) fn metrics(mut self, collect_metrics: bool) -> Self {
        self.collect_metrics = collect_metrics;
        self
    }

    pub(crate) fn is_logged_in(&self) -> bool {
        self.filesystem.is_some()
    }

    // The logged in user's file system. Commands behind the login check can count on it.
    pub(crate) fn storage(&self) -> Result<Arc<dyn FileSystem>, ControlChanError> {
        self.filesystem.clone().ok_or_else(|| ControlChanErrorKind::InternalServerError.into())
    }

    // Resolves a client supplied path against the current directory without touching it.
    pub(crate) fn resolve(&self, path: &str) -> Option<VirtualPath> {
        let mut resolved = self.cwd.clone();
        resolved.navigate(path).then_some(resolved)
    }

    // Installs a new data channel, disposing of the one it replaces.
    pub(crate) fn replace_data_channel(&mut self, channel: DataChannel) {
        if let Some(previous) = self.data_channel.replace(channel) {
            previous.dispose();
        }
    }

    pub(crate) fn close_data_channel(&mut self) {
        if let Some(channel) = self.data_channel.take() {
            channel.dispose();
        }
    }

    // Returns the session to the state right after the greeting, keeping the connection.
    pub(crate) fn reinitialize(&mut self) {
        self.close_data_channel();
        self.username = None;
        self.filesystem = None;
        self.cwd = VirtualPath::root();
        self.rename_from = None;
        self.restart_offset = 0;
        self.transfer_type = TransferType::Ascii;
        self.transfer_mode = TransferMode::Stream;
        self.path_encoding = TextEncoding::Ascii;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("cwd", &self.cwd.to_string())
            .field("rename_from", &self.rename_from)
            .field("restart_offset", &self.restart_offset)
            .field("transfer_type", &self.transfer_type)
            .field("transfer_mode", &self.transfer_mode)
            .field("path_encoding", &self.path_encoding)
            .field("data_channel", &self.data_channel)
            .finish_non_exhaustive()
    }
}
