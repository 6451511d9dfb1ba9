//! The RFC 959 Delete (`DELE`) command
//
// This command causes the file specified in the pathname to be
// deleted at the server site.

use crate::server::controlchan::{
    Reply,
    commands::{file_action_okay, file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Dele;

#[async_trait]
impl Command for Dele {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        match ctx.session.resolve(&args) {
            Some(path) if ctx.session.storage()?.remove_file(&path).await? => {
                slog::info!(ctx.logger, "Deleted file {}", path);
                Ok(file_action_okay())
            }
            _ => Ok(file_unavailable()),
        }
    }
}
