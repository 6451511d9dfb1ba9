//! The RFC 959 System (`SYST`) command
//
// This command is used to find out the type of operating
// system at the server.  The reply shall have as its first
// word one of the system names listed in the current version
// of the Assigned Numbers document [4].
//
// This response is kind of like the User-Agent in http: very much mis-used to gauge
// the capabilities of the other peer. D.J. Bernstein recommends to just respond with
// `UNIX Type: L8` for greatest compatibility.

use crate::server::controlchan::{
    Reply, ReplyCode,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Syst;

#[async_trait]
impl Command for Syst {
    async fn execute(&self, _args: String, _ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::SystemType, "UNIX Type: L8"))
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn reports_unix() {
        let mut harness = Harness::logged_in();
        harness.exec("SYST").await;
        assert_eq!(harness.last_line(), "215 UNIX Type: L8");
    }

    #[tokio::test]
    async fn requires_login() {
        let mut harness = Harness::anonymous();
        harness.exec("syst").await;
        assert_eq!(harness.last_line(), "530 Please authenticate");
    }
}
