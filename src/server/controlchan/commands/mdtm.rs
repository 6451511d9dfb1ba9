//! The RFC 3659 File Modification Time (`MDTM`) command
//
// The FTP command, MODIFICATION TIME (MDTM), can be used to determine
// when a file in the server NVFS was last modified.
//
// The response is a time-val in UTC: YYYYMMDDHHMMSS.

use crate::server::controlchan::{
    Reply, ReplyCode,
    commands::{file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

const RFC3659_TIME: &str = "%Y%m%d%H%M%S";

#[derive(Debug)]
pub struct Mdtm;

#[async_trait]
impl Command for Mdtm {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        let Some(path) = ctx.session.resolve(&args) else {
            return Ok(file_unavailable());
        };
        match ctx.session.storage()?.item(&path).await? {
            Some(item) if !item.is_directory => Ok(Reply::new_with_string(
                ReplyCode::FileStatus,
                item.modified.format(RFC3659_TIME).to_string(),
            )),
            _ => Ok(file_unavailable()),
        }
    }
}
