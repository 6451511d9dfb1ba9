//! The RFC 959 Store (`STOR`) command
//
// This command causes the server-DTP to accept the data
// transferred via the data connection and to store the data as
// a file at the server site.  If the file specified in the
// pathname exists at the server site, then its contents shall
// be replaced by the data being transferred.  A new file is
// created at the server site if the file specified in the
// pathname does not already exist.

use crate::{
    server::controlchan::{
        Reply, ReplyCode,
        commands::{file_unavailable, missing_argument},
        error::ControlChanError,
        handler::{CommandContext, FileTransferCommand},
        transfer::{Direction, count_bytes, transfer_complete, with_data_stream},
    },
    storage::WriteStream,
};
use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncRead, AsyncWriteExt};

#[derive(Debug)]
pub struct Stor;

#[async_trait]
impl FileTransferCommand for Stor {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, offset: u64, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        receive_file(args, offset, WriteMode::Truncate, ctx).await
    }
}

/// How the target file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WriteMode {
    Truncate,
    Append,
}

/// Stores what arrives on the data connection in the file named by `args`, starting `offset`
/// bytes into it.
pub(super) async fn receive_file(args: String, offset: u64, mode: WriteMode, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
    if args.is_empty() {
        return Ok(missing_argument());
    }
    let Some(path) = ctx.session.resolve(&args) else {
        return Ok(file_unavailable());
    };
    let storage = ctx.session.storage()?;
    // A restarted store resumes inside the existing content instead of truncating it.
    let opened = match mode {
        WriteMode::Truncate if offset == 0 => storage.write_file(&path).await?,
        _ => storage.append_file(&path).await?,
    };
    let Some(mut writer) = opened else {
        return Ok(file_unavailable());
    };
    if offset > 0 {
        if let Err(err) = writer.skip_to(offset).await {
            slog::warn!(ctx.logger, "Could not restart {} at byte {}: {}", path, offset, err);
            return Ok(file_unavailable());
        }
    }

    let collect_metrics = ctx.session.collect_metrics;
    let logger = ctx.logger.clone();
    with_data_stream(ctx, move |mut data| async move {
        match copy_into(&mut data, &mut writer).await {
            Ok(received) => {
                count_bytes(collect_metrics, Direction::Received, received);
                slog::info!(logger, "Stored file {}", path; "bytes" => received, "offset" => offset);
                Ok(transfer_complete())
            }
            Err(err) if err.kind() == io::ErrorKind::StorageFull => {
                slog::warn!(logger, "No space left to store {}", path);
                Ok(Reply::new(ReplyCode::ExceededStorageAllocation, "Insufficient storage space"))
            }
            Err(err) => Err(ControlChanError::data_transfer(err)),
        }
    })
    .await
}

async fn copy_into<R: AsyncRead + Unpin + ?Sized>(data: &mut R, writer: &mut WriteStream) -> io::Result<u64> {
    let received = tokio::io::copy(data, writer).await?;
    writer.shutdown().await?;
    Ok(received)
}
