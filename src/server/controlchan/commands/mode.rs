//! The RFC 959 Transfer Mode (`MODE`) command
//
// The argument is a single Telnet character code specifying
// the data transfer modes described in the Section on
// Transmission Modes.
//
// The following codes are assigned for transfer modes:
//
// S - Stream
// B - Block
// C - Compressed
//
// The default transfer mode is Stream, and the only one we support.

use crate::server::{
    controlchan::{
        Reply, ReplyCode,
        commands::missing_argument,
        error::ControlChanError,
        handler::{Command, CommandContext},
    },
    session::TransferMode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Mode;

#[async_trait]
impl Command for Mode {
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        if args.eq_ignore_ascii_case("S") {
            ctx.session.transfer_mode = TransferMode::Stream;
            return Ok(Reply::new(ReplyCode::CommandOkay, "Using Stream transfer mode"));
        }
        Ok(Reply::new(
            ReplyCode::CommandNotImplementedForParameter,
            "Only Stream transfer mode is supported",
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn stream_only() {
        let mut harness = Harness::logged_in();
        harness.exec("MODE s").await;
        assert_eq!(harness.last_line(), "200 Using Stream transfer mode");
        harness.exec("MODE B").await;
        assert_eq!(harness.last_line(), "504 Only Stream transfer mode is supported");
        harness.exec("MODE").await;
        assert_eq!(harness.last_line(), "501 Syntax error in parameters or arguments");
    }
}
