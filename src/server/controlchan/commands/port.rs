//! The RFC 959 Data Port (`PORT`) command
//
// The argument is a HOST-PORT specification for the data port
// to be used in data connection.  There are defaults for both
// the user and server data ports, and under normal
// circumstances this command and its reply are not needed.  If
// this command is used, the argument is the concatenation of a
// 32-bit internet host address and a 16-bit TCP port address.
// This address information is broken into 8-bit fields and the
// value of each field is transmitted as a decimal number (in
// character string representation).  The fields are separated
// by commas.  A port command would be:
//
// PORT h1,h2,h3,h4,p1,p2
//
// where h1 is the high order 8 bits of the internet host
// address.

use crate::server::{
    controlchan::{
        Reply, ReplyCode,
        commands::missing_argument,
        error::ControlChanError,
        handler::{Command, CommandContext},
    },
    datachan::DataChannel,
};
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

#[derive(Debug)]
pub struct Port;

fn parse_host_port(args: &str) -> Option<SocketAddr> {
    let fields = args.split(',').map(|field| field.trim().parse::<u8>()).collect::<Result<Vec<u8>, _>>().ok()?;
    let [h1, h2, h3, h4, p1, p2] = fields.as_slice() else {
        return None;
    };
    let port = u16::from(*p1) * 256 + u16::from(*p2);
    Some(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(*h1, *h2, *h3, *h4), port)))
}

#[async_trait]
impl Command for Port {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let Some(peer) = parse_host_port(&args) else {
            return Ok(missing_argument());
        };
        let channel = DataChannel::active(peer, ctx.session.data_chan_options, ctx.logger);
        ctx.session.replace_data_channel(channel);
        Ok(Reply::new(ReplyCode::CommandOkay, "PORT command successful"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::controlchan::commands::testing::Harness;
    use crate::server::datachan::Mode;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_host_and_port() {
        assert_eq!(parse_host_port("10,0,0,7,4,1"), Some("10.0.0.7:1025".parse().unwrap()));
        assert_eq!(parse_host_port("10,0,0,7,4"), None);
        assert_eq!(parse_host_port("10,0,0,7,4,1,1"), None);
        assert_eq!(parse_host_port("10,0,0,256,4,1"), None);
        assert_eq!(parse_host_port(""), None);
    }

    #[tokio::test]
    async fn installs_an_active_channel() {
        let mut harness = Harness::logged_in();
        harness.exec("PORT 127,0,0,1,4,1").await;
        assert_eq!(harness.last_line(), "200 PORT command successful");
        let mode = harness.session.data_channel.as_ref().map(|c| c.mode());
        assert_eq!(mode, Some(Mode::Active { peer: "127.0.0.1:1025".parse().unwrap() }));
    }

    #[tokio::test]
    async fn bad_argument() {
        let mut harness = Harness::logged_in();
        harness.exec("PORT 1,2,3").await;
        assert_eq!(harness.last_line(), "501 Syntax error in parameters or arguments");
        assert!(harness.session.data_channel.is_none());
    }
}
