//! Wrappers that add the cross-cutting behaviour of FTP commands around a plain [`Command`]:
//! state reset, the login check, argument decoding and restart offset handling. The command
//! registry composes them per command.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext, CommandHandler, FileTransferCommand},
};
use async_trait::async_trait;
use bytes::Bytes;

/// Which session encoding a command's arguments are decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgEncoding {
    Control,
    Path,
}

/// The volatile session fields a command keeps instead of having them reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Retain {
    pub rename_from: bool,
    pub restart_offset: bool,
}

/// Clears the pending rename source and restart offset before the next handler runs, except
/// for what the command retains.
#[derive(Debug)]
pub(crate) struct ResetVolatile<Next> {
    retain: Retain,
    next: Next,
}

impl<Next: CommandHandler> ResetVolatile<Next> {
    pub fn new(retain: Retain, next: Next) -> Self {
        ResetVolatile { retain, next }
    }
}

#[async_trait]
impl<Next: CommandHandler> CommandHandler for ResetVolatile<Next> {
    async fn handle(&self, args: Bytes, ctx: &mut CommandContext<'_>) -> Result<(), ControlChanError> {
        if !self.retain.rename_from {
            ctx.session.rename_from = None;
        }
        if !self.retain.restart_offset {
            ctx.session.restart_offset = 0;
        }
        self.next.handle(args, ctx).await
    }
}

/// Refuses the command with `530` unless a user is logged in.
#[derive(Debug)]
pub(crate) struct RequireLogin<Next> {
    next: Next,
}

impl<Next: CommandHandler> RequireLogin<Next> {
    pub fn new(next: Next) -> Self {
        RequireLogin { next }
    }
}

#[async_trait]
impl<Next: CommandHandler> CommandHandler for RequireLogin<Next> {
    async fn handle(&self, args: Bytes, ctx: &mut CommandContext<'_>) -> Result<(), ControlChanError> {
        if !ctx.session.is_logged_in() {
            return ctx.reply(Reply::new(ReplyCode::NotLoggedIn, "Please authenticate")).await;
        }
        self.next.handle(args, ctx).await
    }
}

/// Decodes the raw arguments and runs the command, sending the reply it returns.
#[derive(Debug)]
pub(crate) struct DecodeArgs<C> {
    encoding: ArgEncoding,
    command: C,
}

impl<C: Command> DecodeArgs<C> {
    pub fn new(encoding: ArgEncoding, command: C) -> Self {
        DecodeArgs { encoding, command }
    }
}

#[async_trait]
impl<C: Command> CommandHandler for DecodeArgs<C> {
    async fn handle(&self, args: Bytes, ctx: &mut CommandContext<'_>) -> Result<(), ControlChanError> {
        let encoding = match self.encoding {
            ArgEncoding::Control => ctx.session.control_encoding,
            ArgEncoding::Path => ctx.session.path_encoding,
        };
        let args = encoding.decode(&args);
        let reply = self.command.execute(args, ctx).await?;
        ctx.reply(reply).await
    }
}

/// Takes the restart offset out of the session and hands it to a file transfer.
#[derive(Debug)]
pub(crate) struct TakeRestartOffset<C> {
    command: C,
}

impl<C: FileTransferCommand> TakeRestartOffset<C> {
    pub fn new(command: C) -> Self {
        TakeRestartOffset { command }
    }
}

#[async_trait]
impl<C: FileTransferCommand> Command for TakeRestartOffset<C> {
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let offset = std::mem::take(&mut ctx.session.restart_offset);
        self.command.execute(args, offset, ctx).await
    }
}
