//! The RFC 2389 Feature (`FEAT`) command
//
// The FEAT command consists solely of the word "FEAT".  It has no
// parameters or arguments.
//
// Where a server-FTP process does not support the FEAT command, it
// will respond to the FEAT command with a 500 or 502 reply.  This is
// simply the normal "unrecognized command" reply that any unknown
// command would elicit.  Errors in the command syntax, such as giving
// parameters, will result in a 501 reply.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

const FEATURES: [&str; 4] = ["UTF8", "MDTM", "SIZE", "REST STREAM"];

#[derive(Debug)]
pub struct Feat;

#[async_trait]
impl Command for Feat {
    async fn execute(&self, _args: String, _ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        Ok(Reply::new_multiline(ReplyCode::SystemStatus, "Features", FEATURES))
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn lists_features() {
        let mut harness = Harness::logged_in();
        harness.exec("FEAT").await;
        assert_eq!(
            harness.lines(),
            vec!["211-Features", " UTF8", " MDTM", " SIZE", " REST STREAM", "211 End"]
        );
    }
}
