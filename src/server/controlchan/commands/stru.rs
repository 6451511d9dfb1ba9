//! The RFC 959 File Structure (`STRU`) command
//
// The argument is a single Telnet character code specifying
// file structure described in the Section on Data
// Representation and Storage.
//
// The following codes are assigned for structure:
//
// F - File (no record structure)
// R - Record structure
// P - Page structure
//
// The default structure is File, and the only one we support.

use crate::server::controlchan::{
    Reply, ReplyCode,
    commands::missing_argument,
    error::ControlChanError,
    handler::{Command, CommandContext},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Stru;

#[async_trait]
impl Command for Stru {
    async fn execute(&self, args: String, _ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        if args.is_empty() {
            return Ok(missing_argument());
        }
        if args.eq_ignore_ascii_case("F") {
            return Ok(Reply::new(ReplyCode::CommandOkay, "In File structure mode"));
        }
        Ok(Reply::new(
            ReplyCode::CommandNotImplementedForParameter,
            "Only File structure is supported",
        ))
    }
}
