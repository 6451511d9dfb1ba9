//! The RFC 959 Passive (`PASV`) command
//
// This command requests the server-DTP to "listen" on a data
// port (which is not its default data port) and to wait for a
// connection rather than initiate one upon receipt of a
// transfer command.  The response to this command includes the
// host and port address this server is listening on.

use crate::server::{
    controlchan::{
        Reply, ReplyCode,
        error::{ControlChanError, ControlChanErrorKind},
        handler::{Command, CommandContext},
    },
    datachan::{DataChannel, Mode},
};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug)]
pub struct Pasv;

/// Builds the `227` reply advertising `ip` and `port` as `h1,h2,h3,h4,p1,p2`.
pub fn make_pasv_reply(ip: Ipv4Addr, port: u16) -> Reply {
    let [h1, h2, h3, h4] = ip.octets();
    let (p1, p2) = (port >> 8, port & 0xFF);
    Reply::new_with_string(
        ReplyCode::EnteringPassiveMode,
        format!("Entering Passive Mode ({},{},{},{},{},{})", h1, h2, h3, h4, p1, p2),
    )
}

// Only IPv4 addresses can be expressed in a PASV reply.
fn advertisable(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}

#[async_trait]
impl Command for Pasv {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, _args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let Some(public_ip) = advertisable(ctx.session.public_address) else {
            slog::warn!(ctx.logger, "Cannot advertise {} in a PASV reply", ctx.session.public_address);
            return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No IPv4 address to offer, use PORT instead"));
        };
        let channel = match DataChannel::passive(ctx.session.bind_address, ctx.session.data_chan_options, ctx.logger) {
            Ok(channel) => channel,
            Err(err) => {
                slog::warn!(ctx.logger, "Could not set up passive listener: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection"));
            }
        };
        let Mode::Passive { local } = channel.mode() else {
            return Err(ControlChanErrorKind::InternalServerError.into());
        };
        ctx.session.replace_data_channel(channel);
        Ok(make_pasv_reply(public_ip, local.port()))
    }
}
