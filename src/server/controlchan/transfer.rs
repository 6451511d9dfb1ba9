//! Runs a transfer against the session's data connection on behalf of the data commands.

use crate::server::{
    controlchan::{
        Reply, ReplyCode,
        error::ControlChanError,
        handler::CommandContext,
    },
    datachan::{DataChanErrorKind, DataStream},
};
use std::future::Future;

const NO_DATA_CONNECTION: &str = "Can't open data connection";

/// Which way the bytes of a transfer flow, for the byte counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Sent,
    Received,
}

/// Waits for the data connection, announces it with `150` and hands its stream to `transfer`.
/// The data channel is torn down afterwards and the reply `transfer` produced is returned for
/// sending. Without a usable data channel the reply is `425`.
pub(super) async fn with_data_stream<F, Fut>(ctx: &mut CommandContext<'_>, transfer: F) -> Result<Reply, ControlChanError>
where
    F: FnOnce(DataStream) -> Fut + Send,
    Fut: Future<Output = Result<Reply, ControlChanError>> + Send,
{
    let Some(channel) = ctx.session.data_channel.as_ref() else {
        return Ok(Reply::new(ReplyCode::CantOpenDataConnection, NO_DATA_CONNECTION));
    };
    let stream = tokio::select! {
        stream = channel.data_stream() => stream,
        _ = ctx.cancel.cancelled() => Err(DataChanErrorKind::Disposed.into()),
    };
    let stream = match stream {
        Ok(stream) => stream,
        Err(err) => {
            slog::warn!(ctx.logger, "Could not open the data connection: {}", err);
            ctx.session.close_data_channel();
            return Ok(Reply::new(ReplyCode::CantOpenDataConnection, NO_DATA_CONNECTION));
        }
    };

    ctx.reply(Reply::new(ReplyCode::FileStatusOkay, "Opening data connection")).await?;
    let result = transfer(stream).await;
    ctx.session.close_data_channel();
    result
}

pub(super) fn transfer_complete() -> Reply {
    Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete")
}

#[cfg(feature = "prometheus")]
pub(super) fn count_bytes(collect_metrics: bool, direction: Direction, bytes: u64) {
    if !collect_metrics {
        return;
    }
    match direction {
        Direction::Sent => crate::metrics::add_sent_bytes(bytes),
        Direction::Received => crate::metrics::add_received_bytes(bytes),
    }
}

#[cfg(not(feature = "prometheus"))]
pub(super) fn count_bytes(_collect_metrics: bool, _direction: Direction, _bytes: u64) {}
