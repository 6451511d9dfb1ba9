//! The RFC 959 Reinitialize (`REIN`) command
//
// This command terminates a USER, flushing all I/O and account
// information, except to allow any transfer in progress to be
// completed.  All parameters are reset to the default settings
// and the control connection is left open.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Rein;

#[async_trait]
impl Command for Rein {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, _args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        ctx.session.reinitialize();
        Ok(Reply::new(ReplyCode::ServiceReady, "Service ready for new user"))
    }
}
