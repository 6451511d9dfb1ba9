use crate::server::{
    controlchan::{Reply, error::ControlChanError},
    session::Session,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::{fmt::Debug, result::Result};
use tokio_util::sync::CancellationToken;

/// Writes replies to the client.
#[async_trait]
pub(crate) trait ReplySender: Send {
    async fn send(&mut self, reply: Reply) -> Result<(), ControlChanError>;
}

/// Convenience struct to group what a command gets to work with
pub(crate) struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub replies: &'a mut dyn ReplySender,
    pub cancel: &'a CancellationToken,
    pub logger: &'a slog::Logger,
}

impl CommandContext<'_> {
    pub async fn reply(&mut self, reply: Reply) -> Result<(), ControlChanError> {
        if let Reply::None = reply {
            return Ok(());
        }
        self.replies.send(reply).await
    }
}

// The uniform entry point of every command in the registry: raw argument bytes in, replies out.
#[async_trait]
pub(crate) trait CommandHandler: Send + Sync + Debug {
    async fn handle(&self, args: Bytes, ctx: &mut CommandContext<'_>) -> Result<(), ControlChanError>;
}

// A plain command working on decoded arguments. The reply it returns is sent for it.
#[async_trait]
pub(crate) trait Command: Send + Sync + Debug {
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError>;
}

// A command that moves a file over the data channel, starting at the restart offset.
#[async_trait]
pub(crate) trait FileTransferCommand: Send + Sync + Debug {
    async fn execute(&self, args: String, offset: u64, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError>;
}
