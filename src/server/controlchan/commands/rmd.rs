//! The RFC 959 Remove Directory (`RMD`) command
//
// This command causes the directory specified in the pathname
// to be removed as a directory (if the pathname is absolute)
// or as a subdirectory of the current working directory (if
// the pathname is relative).

use crate::server::controlchan::{
    Reply,
    commands::{file_action_okay, file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Rmd;

#[async_trait]
impl Command for Rmd {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        match ctx.session.resolve(&args) {
            Some(path) if ctx.session.storage()?.remove_directory(&path).await? => {
                slog::info!(ctx.logger, "Removed directory {}", path);
                Ok(file_action_okay())
            }
            _ => Ok(file_unavailable()),
        }
    }
}
