//! The RFC 959 Name List (`NLST`) command
//
// This command causes a directory listing to be sent from
// server to user site.  The pathname should specify a
// directory or other system-specific file group descriptor; a
// null argument implies the current directory.  The server
// will return a stream of names of files and no other
// information.

use crate::server::controlchan::{
    Reply,
    commands::file_unavailable,
    error::ControlChanError,
    handler::{Command, CommandContext},
    listing::{ListingFormat, items_to_list, send_listing},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Nlst;

#[async_trait]
impl Command for Nlst {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        match items_to_list(ctx.session, &args).await? {
            Some(items) => send_listing(ctx, items, ListingFormat::NamesOnly).await,
            None => Ok(file_unavailable()),
        }
    }
}
