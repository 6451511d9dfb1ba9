//! The RFC 959 Allocate (`ALLO`) command
//
// This command may be required by some servers to reserve
// sufficient storage to accommodate the new file to be
// transferred. Servers not needing it treat it as a NOOP.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Allo;

#[async_trait]
impl Command for Allo {
    async fn execute(&self, _args: String, _ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::CommandOkayNotImplemented, "Allocation not necessary"))
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn superfluous() {
        let mut harness = Harness::logged_in();
        harness.exec("ALLO 1024").await;
        assert_eq!(harness.last_line(), "202 Allocation not necessary");
    }
}
