//! The RFC 959 Password (`PASS`) command
//
// The argument field is a Telnet string specifying the user's
// password.  This command must be immediately preceded by the
// user name command, and, for some sites, completes the user's
// identification for access control.

use crate::{
    path::VirtualPath,
    server::controlchan::{
        Reply, ReplyCode,
        error::ControlChanError,
        handler::{Command, CommandContext},
    },
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Pass;

#[async_trait]
impl Command for Pass {
    #[tracing_attributes::instrument(skip(self, args, ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let accounts = Arc::clone(&ctx.session.accounts);
        let username = ctx.session.username.clone().unwrap_or_default();
        match accounts.get(&username).filter(|user| user.verify(&args)) {
            Some(user) => {
                ctx.session.filesystem = Some(user.filesystem());
                ctx.session.cwd = VirtualPath::root();
                slog::info!(ctx.logger, "User {} logged in", username);
                Ok(Reply::new(ReplyCode::UserLoggedIn, "User logged in, proceed"))
            }
            None => {
                slog::warn!(ctx.logger, "Failed login attempt for user {:?}", username);
                #[cfg(feature = "prometheus")]
                if ctx.session.collect_metrics {
                    crate::metrics::inc_auth_failure();
                }
                Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in"))
            }
        }
    }
}
