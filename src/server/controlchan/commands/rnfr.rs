//! The RFC 959 Rename From (`RNFR`) command
//
// This command specifies the old pathname of the file which is
// to be renamed.  This command must be immediately followed by
// a "rename to" command specifying the new file pathname.

use crate::server::controlchan::{
    Reply, ReplyCode,
    commands::{file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Rnfr;

#[async_trait]
impl Command for Rnfr {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        let Some(source) = ctx.session.resolve(&args) else {
            return Ok(file_unavailable());
        };
        let storage = ctx.session.storage()?;
        if storage.file_exists(&source).await? || storage.directory_exists(&source).await? {
            ctx.session.rename_from = Some(source);
            return Ok(Reply::new(
                ReplyCode::FileActionPending,
                "Tell me, what would you like the new name to be?",
            ));
        }
        Ok(file_unavailable())
    }
}
