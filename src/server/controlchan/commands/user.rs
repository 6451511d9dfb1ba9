//! The RFC 959 User Name (`USER`) command
//
// The argument field is a Telnet string identifying the user.
// The user identification is that which is required by the
// server for access to its file system.  This command will
// normally be the first command transmitted by the user after
// the control connections are made.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct User;

#[async_trait]
impl Command for User {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if !ctx.session.accounts.contains(&args) {
            slog::warn!(ctx.logger, "Unknown user {:?}", args);
            return Ok(Reply::new(ReplyCode::InvalidUsername, "Invalid username"));
        }
        ctx.session.username = Some(args);
        Ok(Reply::new(ReplyCode::NeedPassword, "User name okay, need password"))
    }
}
