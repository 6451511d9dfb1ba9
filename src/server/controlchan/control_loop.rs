//! The per connection control loop: greets the client, reads command lines, dispatches them to
//! the command handlers and ends the session on `QUIT`, disconnect or server shutdown.

use crate::{
    auth::Accounts,
    server::{
        controlchan::{
            CommandLine, ControlChanError, FtpCodec, Reply, ReplyCode,
            commands::CommandRegistry,
            handler::{CommandContext, ReplySender},
        },
        datachan::DataChanOptions,
        ftpserver::options::PassiveHost,
        session::Session,
    },
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::{codec::Framed, sync::CancellationToken};
use uuid::Uuid;

/// What every connection needs from the server. Cloned into each connection's task.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub accounts: Arc<Accounts>,
    pub commands: Arc<CommandRegistry>,
    pub greeting: String,
    pub line_terminator: Bytes,
    pub passive_host: PassiveHost,
    pub data_chan_options: DataChanOptions,
    pub collect_metrics: bool,
    pub logger: slog::Logger,
}

// Sends replies through the framed connection, logging every line sent.
struct ReplySink<S> {
    sink: SplitSink<Framed<S, FtpCodec>, Reply>,
    logger: slog::Logger,
    collect_metrics: bool,
}

#[async_trait]
impl<S> ReplySender for ReplySink<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    async fn send(&mut self, reply: Reply) -> Result<(), ControlChanError> {
        for line in reply.lines() {
            slog::debug!(self.logger, "Sending reply"; "line" => line);
        }
        #[cfg(feature = "prometheus")]
        if self.collect_metrics {
            crate::metrics::add_reply_metric(&reply);
        }
        self.sink.send(reply).await
    }
}

/// Serves one control connection until the client quits, the connection breaks or `cancel`
/// fires. `local` is the address the client connected to, `source` the client's address.
#[tracing_attributes::instrument(skip(config, stream, cancel))]
pub(crate) async fn run<S>(config: Config, stream: S, local: SocketAddr, source: SocketAddr, cancel: CancellationToken)
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    let logger = config
        .logger
        .new(slog::o!("trace-id" => Uuid::new_v4().to_string(), "source" => source.to_string()));

    #[cfg(feature = "prometheus")]
    if config.collect_metrics {
        crate::metrics::inc_session();
    }

    let public_address = public_address(&config.passive_host, local.ip(), &logger).await;
    let mut session = Session::new(Arc::clone(&config.accounts), local.ip(), public_address)
        .line_terminator(config.line_terminator.clone())
        .data_chan_options(config.data_chan_options)
        .metrics(config.collect_metrics);

    let codec = FtpCodec::new(config.line_terminator.clone(), session.control_encoding);
    let (sink, mut lines) = Framed::new(stream, codec).split();
    let mut replies = ReplySink {
        sink,
        logger: logger.clone(),
        collect_metrics: config.collect_metrics,
    };

    if let Err(err) = replies.send(Reply::new(ReplyCode::ServiceReady, &config.greeting)).await {
        slog::warn!(logger, "Could not send the greeting: {}", err);
        return;
    }
    slog::info!(logger, "Starting control loop");

    loop {
        let line = tokio::select! {
            line = lines.next() => line,
            _ = cancel.cancelled() => {
                slog::info!(logger, "Server is shutting down, closing the control connection");
                break;
            }
        };
        let line = match line {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                slog::warn!(logger, "Could not read from the control connection: {}", err);
                break;
            }
            None => {
                slog::info!(logger, "Client closed the control connection");
                break;
            }
        };

        let result = {
            let mut ctx = CommandContext {
                session: &mut session,
                replies: &mut replies,
                cancel: &cancel,
                logger: &logger,
            };
            dispatch(&config.commands, line, &mut ctx).await
        };
        match result {
            Ok(()) => {}
            Err(err) if err.is_fatal() => {
                slog::warn!(logger, "Control connection failed: {}", err);
                break;
            }
            Err(err) => {
                slog::error!(logger, "Command failed: {:?}", err);
                if replies.send(Reply::new(ReplyCode::InternalServerError, "Internal server error")).await.is_err() {
                    break;
                }
            }
        }
        if session.closing {
            break;
        }
    }

    session.close_data_channel();
    slog::info!(logger, "Control connection closed");
}

async fn dispatch(commands: &CommandRegistry, line: CommandLine, ctx: &mut CommandContext<'_>) -> Result<(), ControlChanError> {
    let Some(handler) = commands.get(&line.name) else {
        slog::warn!(ctx.logger, "Unknown command {:?}", line.name);
        return ctx.reply(Reply::new(ReplyCode::CommandNotImplemented, "Command not implemented")).await;
    };
    slog::debug!(ctx.logger, "Received command"; "name" => &line.name);
    #[cfg(feature = "prometheus")]
    if ctx.session.collect_metrics {
        crate::metrics::add_command_metric(&line.name);
    }
    handler.handle(line.args, ctx).await
}

// The address to advertise in PASV replies. Falls back to the connection's local address when a
// configured name does not resolve to IPv4.
async fn public_address(passive_host: &PassiveHost, bind_address: IpAddr, logger: &slog::Logger) -> IpAddr {
    match passive_host {
        PassiveHost::FromConnection => bind_address,
        PassiveHost::IP(ip) => IpAddr::V4(*ip),
        PassiveHost::DNS(name) => match tokio::net::lookup_host((name.as_str(), 0)).await {
            Ok(mut addrs) => match addrs.find(SocketAddr::is_ipv4) {
                Some(addr) => addr.ip(),
                None => {
                    slog::warn!(logger, "No IPv4 address found for {}, advertising {}", name, bind_address);
                    bind_address
                }
            },
            Err(err) => {
                slog::warn!(logger, "Could not resolve {}, advertising {}: {}", name, bind_address, err);
                bind_address
            }
        },
    }
}
