//! The RFC 959 Change To Parent Directory (`CDUP`) command
//
// This command is a special case of CWD, and is included to
// simplify the implementation of programs for transferring
// directory trees between operating systems having different
// syntaxes for naming the parent directory.  The reply codes
// shall be identical to the reply codes of CWD.

use crate::server::controlchan::{
    Reply,
    commands::{file_action_okay, file_unavailable},
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Cdup;

#[async_trait]
impl Command for Cdup {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, _args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let mut parent = ctx.session.cwd.clone();
        if parent.navigate_up() && ctx.session.storage()?.directory_exists(&parent).await? {
            ctx.session.cwd = parent;
            return Ok(file_action_okay());
        }
        Ok(file_unavailable())
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn moves_up() {
        let mut harness = Harness::logged_in();
        harness.fs.insert_file("/pub/docs/readme.txt", "hi", Utc::now());
        harness.session.cwd = "/pub/docs".parse().unwrap();
        harness.exec("XCUP").await;
        assert_eq!(harness.last_line(), "250 File action okay");
        assert_eq!(harness.session.cwd.to_string(), "/pub");
    }

    #[tokio::test]
    async fn not_above_root() {
        let mut harness = Harness::logged_in();
        harness.exec("CDUP").await;
        assert_eq!(harness.last_line(), "550 File unavailable");
        assert!(harness.session.cwd.is_root());
    }
}
