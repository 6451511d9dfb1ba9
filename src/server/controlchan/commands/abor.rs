//! The RFC 959 Abort (`ABOR`) command
//
// This command tells the server to abort the previous FTP
// service command and any associated transfer of data.

use crate::server::controlchan::{
    Reply,
    error::ControlChanError,
    handler::{Command, CommandContext},
    transfer::transfer_complete,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Abor;

#[async_trait]
impl Command for Abor {
    async fn execute(&self, _args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        ctx.session.close_data_channel();
        Ok(transfer_complete())
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn drops_the_data_channel() {
        let mut harness = Harness::logged_in();
        let _client = harness.open_passive().await;
        harness.exec("ABOR").await;
        assert_eq!(harness.last_line(), "226 Transfer complete");
        assert!(harness.session.data_channel.is_none());
    }

    #[tokio::test]
    async fn without_data_channel() {
        let mut harness = Harness::logged_in();
        harness.exec("ABOR").await;
        assert_eq!(harness.last_line(), "226 Transfer complete");
    }
}
