//! The RFC 959 Rename To (`RNTO`) command
//
// This command specifies the new pathname of the file
// specified in the immediately preceding "rename from"
// command.  Together the two commands cause a file to be
// renamed.

use crate::server::controlchan::{
    Reply,
    commands::{file_action_okay, file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Rnto;

#[async_trait]
impl Command for Rnto {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let source = ctx.session.rename_from.take();
        if args.is_empty() {
            return Ok(missing_argument());
        }
        let (Some(source), Some(target)) = (source, ctx.session.resolve(&args)) else {
            return Ok(file_unavailable());
        };
        let storage = ctx.session.storage()?;
        if storage.file_exists(&source).await? && storage.rename_file(&source, &target).await? {
            slog::info!(ctx.logger, "Renamed file {} to {}", source, target);
            return Ok(file_action_okay());
        }
        if storage.directory_exists(&source).await? && storage.rename_directory(&source, &target).await? {
            slog::info!(ctx.logger, "Renamed directory {} to {}", source, target);
            return Ok(file_action_okay());
        }
        Ok(file_unavailable())
    }
}
