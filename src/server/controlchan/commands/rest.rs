//! The RFC 3659 Restart Of Interrupted Transfer (`REST`) command
//
// To avoid having to resend the entire file if the file is only
// partially transferred, both sides need some way to agree on where in
// the data stream to restart the data transfer.
//
// The REST command does not actually initiate any sort of file
// transfer, it merely sets the position the next RETR, STOR or APPE
// starts at.

use crate::server::controlchan::{
    Reply, ReplyCode,
    commands::missing_argument,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Rest;

#[async_trait]
impl Command for Rest {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let Ok(offset) = args.trim().parse::<u64>() else {
            return Ok(missing_argument());
        };
        ctx.session.restart_offset = offset;
        Ok(Reply::new_with_string(
            ReplyCode::FileActionPending,
            format!("Restarting at {}. Now send STORE or RETRIEVE.", offset),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn stores_the_offset() {
        let mut harness = Harness::logged_in();
        harness.exec("REST 100").await;
        assert_eq!(harness.last_line(), "350 Restarting at 100. Now send STORE or RETRIEVE.");
        assert_eq!(harness.session.restart_offset, 100);
    }

    #[tokio::test]
    async fn other_commands_clear_the_offset() {
        let mut harness = Harness::logged_in();
        harness.exec("REST 100").await;
        harness.exec("NOOP").await;
        assert_eq!(harness.session.restart_offset, 0);
    }

    #[tokio::test]
    async fn rejects_non_numbers() {
        let mut harness = Harness::logged_in();
        harness.exec("REST -1").await;
        assert_eq!(harness.last_line(), "501 Syntax error in parameters or arguments");
        harness.exec("REST abc").await;
        assert_eq!(harness.last_line(), "501 Syntax error in parameters or arguments");
    }
}
