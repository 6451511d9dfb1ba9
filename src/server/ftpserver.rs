//! Contains the [`Server`] and [`ServerBuilder`] structs used to configure and run an FTP server.

pub(crate) mod error;
mod listen;
pub mod options;

use self::{
    error::ServerError,
    options::{DEFAULT_GREETING, DEFAULT_LINE_TERMINATOR, DEFAULT_PASSIVE_HOST, PassiveHost},
};
use crate::{
    auth::{Accounts, FtpUser},
    server::{
        controlchan::{commands::CommandRegistry, control_loop::Config},
        datachan::DataChanOptions,
    },
};
use bytes::Bytes;
use slog::Drain;
use std::{fmt, future::Future, net::SocketAddr, pin::Pin, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

type ShutdownIndicator = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Used to configure and build a [`Server`].
///
/// # Example
///
/// ```rust
/// use zeptoftp::{ServerBuilder, auth::FtpUser, storage::MemoryFileSystem};
/// use std::sync::Arc;
///
/// let alice = FtpUser::new("alice", "secret", Arc::new(MemoryFileSystem::new()));
/// let server = ServerBuilder::new(vec![alice])
///     .greeting("Welcome to my FTP server")
///     .passive_host("127.0.0.1")
///     .build()
///     .unwrap();
/// ```
pub struct ServerBuilder {
    accounts: Accounts,
    greeting: String,
    line_terminator: Bytes,
    passive_host: PassiveHost,
    logger: slog::Logger,
    data_chan_options: DataChanOptions,
    collect_metrics: bool,
    shutdown: Option<ShutdownIndicator>,
}

impl ServerBuilder {
    /// Creates a builder for a server that accepts the given accounts. All other options start
    /// out with their defaults.
    pub fn new<I: IntoIterator<Item = FtpUser>>(users: I) -> Self {
        ServerBuilder {
            accounts: users.into_iter().collect(),
            greeting: DEFAULT_GREETING.to_string(),
            line_terminator: Bytes::from_static(DEFAULT_LINE_TERMINATOR),
            passive_host: DEFAULT_PASSIVE_HOST,
            logger: slog::Logger::root(slog_stdlog::StdLog {}.fuse(), slog::o!()),
            data_chan_options: DataChanOptions::default(),
            collect_metrics: false,
            shutdown: None,
        }
    }

    /// Set the greeting that will be sent to the client after connecting.
    pub fn greeting<G: Into<String>>(mut self, greeting: G) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the byte sequence that ends command lines and reply lines. RFC 959 requires `\r\n`,
    /// which is the default.
    pub fn line_terminator<T: Into<Bytes>>(mut self, line_terminator: T) -> Self {
        self.line_terminator = line_terminator.into();
        self
    }

    /// Specifies how the IP address that zeptoftp advertises in response to the PASV command is
    /// determined.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zeptoftp::{ServerBuilder, options::PassiveHost};
    /// use std::net::Ipv4Addr;
    ///
    /// let builder = ServerBuilder::new(vec![]).passive_host(Ipv4Addr::new(127, 0, 0, 1));
    /// let builder = ServerBuilder::new(vec![]).passive_host("ftp.myserver.org");
    /// let builder = ServerBuilder::new(vec![]).passive_host(PassiveHost::FromConnection);
    /// ```
    pub fn passive_host<H: Into<PassiveHost>>(mut self, host_option: H) -> Self {
        self.passive_host = host_option.into();
        self
    }

    /// Sets the structured logger (<https://docs.rs/slog>) to use. Without one, records go to
    /// the `log` crate.
    pub fn logger<L: Into<Option<slog::Logger>>>(mut self, logger: L) -> Self {
        if let Some(logger) = logger.into() {
            self.logger = logger;
        }
        self
    }

    /// Logs every chunk read from or written to a data connection at debug level.
    pub fn trace_data_channel(mut self, trace: bool) -> Self {
        self.data_chan_options.trace = trace;
        self
    }

    /// Bounds how long a transfer command waits for the client to connect to or accept the data
    /// connection. The transfer is answered with `425` when the time is up. There is no limit by
    /// default.
    pub fn data_connect_timeout(mut self, timeout: Duration) -> Self {
        self.data_chan_options.connect_timeout = Some(timeout);
        self
    }

    /// Enables the collection of prometheus metrics.
    pub fn metrics(mut self) -> Self {
        self.collect_metrics = true;
        self
    }

    /// Allows telling zeptoftp when and how to shutdown gracefully.
    ///
    /// Once the given future completes, the server stops accepting connections, ends every open
    /// control connection and returns from [`Server::listen`].
    pub fn shutdown_indicator<I>(mut self, indicator: I) -> Self
    where
        I: Future<Output = ()> + Send + 'static,
    {
        self.shutdown = Some(Box::pin(indicator));
        self
    }

    /// Checks the configuration and creates the [`Server`].
    pub fn build(self) -> Result<Server, ServerError> {
        if self.line_terminator.is_empty() {
            return Err(ServerError::config("the line terminator cannot be empty"));
        }
        if self.greeting.contains(['\r', '\n']) {
            return Err(ServerError::config("the greeting must be a single line"));
        }
        if !cfg!(feature = "prometheus") && self.collect_metrics {
            slog::warn!(self.logger, "Metrics were enabled but zeptoftp was built without the prometheus feature");
        }
        Ok(Server {
            config: Config {
                accounts: Arc::new(self.accounts),
                commands: Arc::new(CommandRegistry::new()),
                greeting: self.greeting,
                line_terminator: self.line_terminator,
                passive_host: self.passive_host,
                data_chan_options: self.data_chan_options,
                collect_metrics: self.collect_metrics,
                logger: self.logger,
            },
            shutdown: self.shutdown,
        })
    }
}

impl fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("accounts", &self.accounts)
            .field("greeting", &self.greeting)
            .field("line_terminator", &self.line_terminator)
            .field("passive_host", &self.passive_host)
            .field("data_chan_options", &self.data_chan_options)
            .field("collect_metrics", &self.collect_metrics)
            .field("shutdown_indicator", &self.shutdown.is_some())
            .finish()
    }
}

/// An instance of an FTP server. It accepts control connections and serves every one of them in
/// its own task.
///
/// Build one with a [`ServerBuilder`].
pub struct Server {
    config: Config,
    shutdown: Option<ShutdownIndicator>,
}

impl Server {
    /// Runs the server, listening on the given address (like `"127.0.0.1:2121"`). Returns once the
    /// shutdown indicator fired, or with an error when the address cannot be bound.
    pub async fn listen<T: Into<String>>(self, bind_address: T) -> Result<(), ServerError> {
        let addr: SocketAddr = bind_address.into().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Runs the server on an already bound listener.
    #[tracing_attributes::instrument(skip(self))]
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let Server { config, shutdown } = self;
        let logger = config.logger.clone();
        slog::info!(logger, "Listening on {}", listener.local_addr()?);

        let connections = CancellationToken::new();
        let listener = listen::Listener {
            listener,
            config,
            shutdown: connections.clone(),
        };
        match shutdown {
            Some(indicator) => {
                tokio::select! {
                    _ = listener.listen() => {},
                    _ = indicator => {
                        slog::info!(logger, "Shutting down, closing all control connections");
                        connections.cancel();
                    }
                }
            }
            None => listener.listen().await,
        }
        Ok(())
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("shutdown_indicator", &self.shutdown.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryFileSystem;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    fn alice() -> FtpUser {
        FtpUser::new("alice", "secret", Arc::new(MemoryFileSystem::new()))
    }

    fn quiet() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(ServerBuilder::new(vec![alice()]).line_terminator(Bytes::new()).build().is_err());
        assert!(ServerBuilder::new(vec![alice()]).greeting("two\r\nlines").build().is_err());
        assert!(ServerBuilder::new(vec![alice()]).build().is_ok());
    }

    #[test]
    fn builder_sets_options() {
        let server = ServerBuilder::new(vec![alice()])
            .greeting("Hi")
            .passive_host("10.1.2.3")
            .trace_data_channel(true)
            .data_connect_timeout(Duration::from_secs(5))
            .logger(quiet())
            .build()
            .unwrap();
        assert_eq!(server.config.greeting, "Hi");
        assert_eq!(server.config.passive_host, PassiveHost::IP([10, 1, 2, 3].into()));
        assert_eq!(
            server.config.data_chan_options,
            DataChanOptions {
                trace: true,
                connect_timeout: Some(Duration::from_secs(5)),
            }
        );
        assert_eq!(server.config.accounts.len(), 1);
    }

    #[tokio::test]
    async fn custom_line_terminator() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = ServerBuilder::new(vec![alice()]).line_terminator("\n").logger(quiet()).build().unwrap();
        tokio::spawn(server.serve(listener));

        let mut client = BufReader::new(TcpStream::connect(addr).await.unwrap());
        let mut line = String::new();
        client.read_line(&mut line).await.unwrap();
        assert_eq!(line, format!("220 {}\n", DEFAULT_GREETING));
        client.get_mut().write_all(b"USER alice\n").await.unwrap();
        line.clear();
        client.read_line(&mut line).await.unwrap();
        assert_eq!(line, "331 User name okay, need password\n");
    }

    #[tokio::test]
    async fn shutdown_indicator_stops_the_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let server = ServerBuilder::new(vec![alice()])
            .logger(quiet())
            .shutdown_indicator(async move {
                let _ = stopped.await;
            })
            .build()
            .unwrap();
        let running = tokio::spawn(server.serve(listener));

        let mut client = TcpStream::connect(addr).await.unwrap();
        let mut greeting = [0u8; 4];
        client.read_exact(&mut greeting).await.unwrap();
        assert_eq!(&greeting, b"220 ");

        stop.send(()).unwrap();
        running.await.unwrap().unwrap();
        let mut rest = Vec::new();
        client.read_to_end(&mut rest).await.unwrap();
        assert!(rest.ends_with(b"\r\n"));
        assert!(TcpStream::connect(addr).await.is_err());
    }
}
