//! Contains code pertaining to the setup options that can be given to the
//! [`ServerBuilder`](crate::ServerBuilder)

use std::net::{IpAddr, Ipv4Addr};

// Once we're sure about the types of these I think its good to expose it to the API user so that
// he/she can see what our server defaults are.
pub(crate) const DEFAULT_GREETING: &str = "Welcome to the zeptoftp FTP server";
pub(crate) const DEFAULT_LINE_TERMINATOR: &[u8] = b"\r\n";
pub(crate) const DEFAULT_PASSIVE_HOST: PassiveHost = PassiveHost::FromConnection;

/// The option to `ServerBuilder.passive_host`. It allows the user to specify how the IP address
/// communicated in the _PASV_ response is determined.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PassiveHost {
    /// Use the IP address of the control connection
    FromConnection,
    /// Advertise this specific IP address
    IP(Ipv4Addr),
    /// Resolve this DNS name into an IPv4 address when a client connects. The address of the
    /// control connection is used if that fails.
    DNS(String),
}

impl From<Ipv4Addr> for PassiveHost {
    fn from(ip: Ipv4Addr) -> Self {
        PassiveHost::IP(ip)
    }
}

impl From<[u8; 4]> for PassiveHost {
    fn from(ip: [u8; 4]) -> Self {
        PassiveHost::IP(ip.into())
    }
}

impl From<&str> for PassiveHost {
    fn from(dns_or_ip: &str) -> Self {
        match dns_or_ip.parse() {
            Ok(IpAddr::V4(ip)) => PassiveHost::IP(ip),
            _ => PassiveHost::DNS(dns_or_ip.to_string()),
        }
    }
}
