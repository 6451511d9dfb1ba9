//! The RFC 3659 File Size (`SIZE`) command
//
// The FTP command, SIZE OF FILE (SIZE), is used to obtain the transfer
// size of a file from the server-FTP process.  This is the exact number
// of octets (8 bit bytes) that would be transmitted over the data
// connection should that file be transmitted.
//
// Sizes are only reported in Image type, where they equal the stored size.

use crate::server::{
    controlchan::{
        Reply, ReplyCode,
        commands::{file_unavailable, missing_argument},
        error::ControlChanError,
        handler::{Command, CommandContext},
    },
    session::TransferType,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Size;

#[async_trait]
impl Command for Size {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        if ctx.session.transfer_type != TransferType::Image {
            return Ok(file_unavailable());
        }
        let Some(path) = ctx.session.resolve(&args) else {
            return Ok(file_unavailable());
        };
        match ctx.session.storage()?.item(&path).await? {
            Some(item) if !item.is_directory => Ok(Reply::new_with_string(ReplyCode::FileStatus, item.size.to_string())),
            _ => Ok(file_unavailable()),
        }
    }
}
