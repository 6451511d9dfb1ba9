//! The RFC 959 No Operation (`NOOP`) command
//
// This command does not affect any parameters or previously
// entered commands. It specifies no action other than that the
// server send an OK reply.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Noop;

#[async_trait]
impl Command for Noop {
    async fn execute(&self, _args: String, _ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::CommandOkay, "Successfully did nothing"))
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn does_nothing() {
        let mut harness = Harness::logged_in();
        harness.exec("NOOP").await;
        assert_eq!(harness.last_line(), "200 Successfully did nothing");
    }
}
