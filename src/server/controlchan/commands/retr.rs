//! The RFC 959 Retrieve (`RETR`) command
//
// This command causes the server-DTP to transfer a copy of the
// file, specified in the pathname, to the server- or user-DTP
// at the other end of the data connection.  The status and
// contents of the file at the server site shall be unaffected.

use crate::server::controlchan::{
    Reply,
    commands::{file_unavailable, missing_argument},
    error::ControlChanError,
    handler::{CommandContext, FileTransferCommand},
    transfer::{Direction, count_bytes, transfer_complete, with_data_stream},
};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub struct Retr;

#[async_trait]
impl FileTransferCommand for Retr {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, offset: u64, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        let Some(path) = ctx.session.resolve(&args) else {
            return Ok(file_unavailable());
        };
        let Some(mut reader) = ctx.session.storage()?.read_file(&path).await? else {
            return Ok(file_unavailable());
        };
        if offset > 0 {
            if let Err(err) = reader.skip_to(offset).await {
                slog::warn!(ctx.logger, "Could not restart {} at byte {}: {}", path, offset, err);
                return Ok(file_unavailable());
            }
        }

        let collect_metrics = ctx.session.collect_metrics;
        let logger = ctx.logger.clone();
        with_data_stream(ctx, move |mut data| async move {
            let sent = tokio::io::copy(&mut reader, &mut data).await.map_err(ControlChanError::data_transfer)?;
            data.shutdown().await.map_err(ControlChanError::data_transfer)?;
            count_bytes(collect_metrics, Direction::Sent, sent);
            slog::info!(logger, "Retrieved file {}", path; "bytes" => sent, "offset" => offset);
            Ok(transfer_complete())
        })
        .await
    }
}
