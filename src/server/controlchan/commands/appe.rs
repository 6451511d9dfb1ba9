//! The RFC 959 Append (with create) (`APPE`) command
//
// This command causes the server-DTP to accept the data
// transferred via the data connection and to store the data in
// a file at the server site.  If the file specified in the
// pathname exists at the server site, then the data shall be
// appended to that file; otherwise the file specified in the
// pathname shall be created at the server site.

use super::stor::{WriteMode, receive_file};
use crate::server::controlchan::{
    Reply,
    error::ControlChanError,
    handler::{CommandContext, FileTransferCommand},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Appe;

#[async_trait]
impl FileTransferCommand for Appe {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, offset: u64, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        receive_file(args, offset, WriteMode::Append, ctx).await
    }
}
