//! The RFC 959 Change Working Directory (`CWD`) command
//
// This command allows the user to work with a different
// directory or dataset for file storage or retrieval without
// altering his login or accounting information.  Transfer
// parameters are similarly unchanged.  The argument is a
// pathname specifying a directory or other system dependent
// file group designator.

use crate::server::controlchan::{
    Reply,
    commands::{file_action_okay, file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Cwd;

#[async_trait]
impl Command for Cwd {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        // Probe on a copy, the working directory only changes on success.
        match ctx.session.resolve(&args) {
            Some(path) if ctx.session.storage()?.directory_exists(&path).await? => {
                ctx.session.cwd = path;
                Ok(file_action_okay())
            }
            _ => Ok(file_unavailable()),
        }
    }
}
