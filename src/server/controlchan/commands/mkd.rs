//! The RFC 959 Make Directory (`MKD`) command
//
// This command causes the directory specified in the pathname
// to be created as a directory (if the pathname is absolute)
// or as a subdirectory of the current working directory (if
// the pathname is relative).

use crate::server::controlchan::{
    Reply, ReplyCode,
    commands::{file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Mkd;

#[async_trait]
impl Command for Mkd {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        match ctx.session.resolve(&args) {
            Some(path) if ctx.session.storage()?.create_directory(&path).await? => {
                slog::info!(ctx.logger, "Created directory {}", path);
                Ok(Reply::new_path(ReplyCode::DirCreated, path, ctx.session.path_encoding))
            }
            _ => Ok(file_unavailable()),
        }
    }
}
