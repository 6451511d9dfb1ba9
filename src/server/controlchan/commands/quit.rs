//! The RFC 959 Logout (`QUIT`) command
//
// This command terminates a USER and if file transfer is not
// in progress, the server closes the control connection.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Quit;

#[async_trait]
impl Command for Quit {
    async fn execute(&self, _args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        // The control loop ends the session once this reply is out.
        ctx.session.closing = true;
        Ok(Reply::new(ReplyCode::ClosingControlConnection, "Bye!"))
    }
}
