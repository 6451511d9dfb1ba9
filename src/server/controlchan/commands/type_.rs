//! The RFC 959 Representation Type (`TYPE`) command
//
// The argument specifies the representation type as described
// in the Section on Data Representation and Storage.  Several
// types take a second parameter.  The first parameter is
// denoted by a single Telnet character, as is the second
// Format parameter for ASCII and EBCDIC.
//
// Only ASCII non-print (`A`, `A N`) and Image (`I`) are supported.

use crate::server::{
    controlchan::{
        Reply, ReplyCode,
        error::ControlChanError,
        handler::{Command, CommandContext},
    },
    session::TransferType,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Type;

fn not_implemented() -> Reply {
    Reply::new(ReplyCode::CommandNotImplementedForParameter, "Command not implemented for that parameter")
}

#[async_trait]
impl Command for Type {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let mut params = args.split(' ');
        match params.next().unwrap_or_default() {
            "A" => {
                ctx.session.transfer_type = TransferType::Ascii;
                match params.next() {
                    None | Some("N") => Ok(Reply::new(ReplyCode::CommandOkay, "Switching to ASCII mode")),
                    Some(_) => Ok(not_implemented()),
                }
            }
            "I" => {
                ctx.session.transfer_type = TransferType::Image;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to Binary mode"))
            }
            _ => Ok(not_implemented()),
        }
    }
}
