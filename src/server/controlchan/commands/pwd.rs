//! The RFC 959 Print Working Directory (`PWD`) command
//
// This command causes the name of the current working
// directory to be returned in the reply.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Pwd;

#[async_trait]
impl Command for Pwd {
    async fn execute(&self, _args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        Ok(Reply::new_path(ReplyCode::DirCreated, &ctx.session.cwd, ctx.session.path_encoding))
    }
}
