//! Contains the code that accepts control channel connections.

use crate::server::controlchan::control_loop::{self, Config};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

// Listener accepts control channel connections on a TCP port and spawns a control channel loop
// in a new task for each of them. Every loop gets a child of `shutdown`.
pub(super) struct Listener {
    pub listener: TcpListener,
    pub config: Config,
    pub shutdown: CancellationToken,
}

impl Listener {
    pub async fn listen(self) {
        let Listener { listener, config, shutdown } = self;
        let logger = config.logger.clone();
        loop {
            match listener.accept().await {
                Ok((tcp_stream, source)) => {
                    slog::info!(logger, "Incoming control connection from {:?}", source);
                    match tcp_stream.local_addr() {
                        Ok(local) => {
                            tokio::spawn(control_loop::run(config.clone(), tcp_stream, local, source, shutdown.child_token()));
                        }
                        Err(err) => {
                            slog::error!(logger, "Could not determine the local address of the connection from {:?}: {:?}", source, err);
                        }
                    }
                }
                Err(err) => {
                    slog::error!(logger, "Error accepting incoming control connection {:?}", err);
                }
            }
        }
    }
}
