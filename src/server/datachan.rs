//! Contains code pertaining to the FTP *data* channel
//!
//! A data channel is set up by `PASV` (the server listens) or `PORT` (the server connects out).
//! Either way the accept or connect starts right away in its own task, since some clients
//! connect or even start sending before they issue the transfer command. The transfer command
//! later awaits the outcome through [`DataChannel::data_stream`].

use crate::server::stream::TracingStream;
use derive_more::Display;
use std::{
    fmt,
    future::Future,
    io,
    net::{IpAddr, SocketAddr},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpSocket, TcpStream},
    sync::oneshot,
};
use tokio_util::sync::CancellationToken;

pub(crate) trait AsyncReadAsyncWriteSendUnpin: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncReadAsyncWriteSendUnpin for T {}

/// The byte stream of an established data connection.
pub(crate) type DataStream = Box<dyn AsyncReadAsyncWriteSendUnpin>;

/// Settings every data channel of a session is created with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DataChanOptions {
    // Log all bytes passing through the data connection.
    pub trace: bool,
    // How long a transfer waits for the client to connect. Forever if unset.
    pub connect_timeout: Option<Duration>,
}

#[derive(Debug, Error)]
#[error("data channel error: {kind}")]
pub(crate) struct DataChanError {
    kind: DataChanErrorKind,
    #[source]
    source: Option<io::Error>,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataChanErrorKind {
    #[display("could not set up the data connection")]
    Establish,
    #[display("the data channel was disposed")]
    Disposed,
    #[display("the data stream was already taken")]
    AlreadyTaken,
    #[display("timed out waiting for the data connection")]
    TimedOut,
}

impl DataChanError {
    fn establish(err: io::Error) -> Self {
        DataChanError {
            kind: DataChanErrorKind::Establish,
            source: Some(err),
        }
    }

    pub(crate) fn kind(&self) -> DataChanErrorKind {
        self.kind
    }
}

impl From<DataChanErrorKind> for DataChanError {
    fn from(kind: DataChanErrorKind) -> Self {
        DataChanError { kind, source: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Active { peer: SocketAddr },
    Passive { local: SocketAddr },
}

type Establishment = oneshot::Receiver<Result<DataStream, DataChanError>>;

pub(crate) struct DataChannel {
    mode: Mode,
    options: DataChanOptions,
    // Taken exactly once, by whoever gets there first: the transfer or dispose.
    establishment: Mutex<Option<Establishment>>,
    disposed: AtomicBool,
    cancel: CancellationToken,
    logger: slog::Logger,
}

impl DataChannel {
    /// Binds an ephemeral port on `bind_address` and starts accepting one connection on it.
    pub(crate) fn passive(bind_address: IpAddr, options: DataChanOptions, logger: &slog::Logger) -> Result<DataChannel, DataChanError> {
        let socket = match bind_address {
            IpAddr::V4(_) => TcpSocket::new_v4(),
            IpAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(DataChanError::establish)?;
        socket.bind(SocketAddr::new(bind_address, 0)).map_err(DataChanError::establish)?;
        let local = socket.local_addr().map_err(DataChanError::establish)?;
        let listener = socket.listen(1).map_err(DataChanError::establish)?;
        let logger = logger.new(slog::o!("data-channel" => "passive", "local" => local.to_string()));
        slog::debug!(logger, "Listening for a data connection");

        // The listener lives inside the accept future and closes as soon as it completes or
        // gets dropped.
        let accept = async move { listener.accept().await.map(|(stream, _)| stream) };
        Ok(DataChannel::establish(Mode::Passive { local }, options, logger, accept))
    }

    /// Starts connecting to the client's data port at `peer`.
    pub(crate) fn active(peer: SocketAddr, options: DataChanOptions, logger: &slog::Logger) -> DataChannel {
        let logger = logger.new(slog::o!("data-channel" => "active", "peer" => peer.to_string()));
        slog::debug!(logger, "Connecting to the client's data port");
        DataChannel::establish(Mode::Active { peer }, options, logger, TcpStream::connect(peer))
    }

    fn establish<F>(mode: Mode, options: DataChanOptions, logger: slog::Logger, connect: F) -> DataChannel
    where
        F: Future<Output = io::Result<TcpStream>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (tx, rx) = oneshot::channel();
        let task_cancel = cancel.clone();
        let task_logger = logger.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = task_cancel.cancelled() => Err(DataChanError::from(DataChanErrorKind::Disposed)),
                connected = connect => match connected {
                    Ok(stream) => {
                        let peer = stream.peer_addr().map(|a| a.to_string()).unwrap_or_default();
                        slog::debug!(task_logger, "Data connection established"; "remote" => peer);
                        Ok(wrap(stream, options.trace, &task_logger))
                    }
                    Err(err) => {
                        slog::warn!(task_logger, "Could not establish data connection: {}", err);
                        Err(DataChanError::establish(err))
                    }
                },
            };
            // The receiver is gone if the channel was disposed, the stream then just drops.
            let _ = tx.send(result);
        });
        DataChannel {
            mode,
            options,
            establishment: Mutex::new(Some(rx)),
            disposed: AtomicBool::new(false),
            cancel,
            logger,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    /// Waits for the connection to be established and returns its stream. Can only succeed once.
    pub(crate) async fn data_stream(&self) -> Result<DataStream, DataChanError> {
        let establishment = self.establishment.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(establishment) = establishment else {
            return Err(if self.is_disposed() { DataChanErrorKind::Disposed } else { DataChanErrorKind::AlreadyTaken }.into());
        };
        let outcome = match self.options.connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, establishment).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(DataChanErrorKind::TimedOut.into()),
            },
            None => establishment.await,
        };
        outcome.unwrap_or_else(|_| Err(DataChanErrorKind::Disposed.into()))
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Releases the listening or connecting socket. A pending [`data_stream`](Self::data_stream)
    /// then fails. Only the first call has an effect.
    pub(crate) fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.cancel.cancel();
        drop(self.establishment.lock().unwrap_or_else(PoisonError::into_inner).take());
        slog::debug!(self.logger, "Data channel disposed");
    }
}

impl Drop for DataChannel {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for DataChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataChannel")
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn wrap(stream: TcpStream, trace: bool, logger: &slog::Logger) -> DataStream {
    if trace {
        Box::new(TracingStream::new(stream, logger.clone()))
    } else {
        Box::new(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::net::Ipv4Addr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn localhost() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn passive_port(channel: &DataChannel) -> u16 {
        match channel.mode() {
            Mode::Passive { local } => local.port(),
            Mode::Active { .. } => panic!("not a passive channel"),
        }
    }

    #[tokio::test]
    async fn passive_round_trip() {
        let channel = DataChannel::passive(localhost(), DataChanOptions::default(), &logger()).unwrap();
        let mut peer = TcpStream::connect((Ipv4Addr::LOCALHOST, passive_port(&channel))).await.unwrap();
        peer.write_all(b"some payload").await.unwrap();
        peer.shutdown().await.unwrap();

        let mut stream = channel.data_stream().await.unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"some payload".to_vec());
    }

    #[tokio::test]
    async fn passive_round_trip_with_tracing() {
        let options = DataChanOptions {
            trace: true,
            ..DataChanOptions::default()
        };
        let channel = DataChannel::passive(localhost(), options, &logger()).unwrap();
        let mut peer = TcpStream::connect((Ipv4Addr::LOCALHOST, passive_port(&channel))).await.unwrap();
        let mut stream = channel.data_stream().await.unwrap();
        stream.write_all(b"listing").await.unwrap();
        stream.shutdown().await.unwrap();
        let mut received = Vec::new();
        peer.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"listing".to_vec());
    }

    #[tokio::test]
    async fn active_connects_out() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let channel = DataChannel::active(listener.local_addr().unwrap(), DataChanOptions::default(), &logger());
        let (mut client_side, _) = listener.accept().await.unwrap();
        let mut stream = channel.data_stream().await.unwrap();
        stream.write_all(b"file content").await.unwrap();
        stream.shutdown().await.unwrap();
        let mut received = Vec::new();
        client_side.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"file content".to_vec());
    }

    #[tokio::test]
    async fn dispose_fails_pending_stream() {
        let channel = DataChannel::passive(localhost(), DataChanOptions::default(), &logger()).unwrap();
        channel.dispose();
        channel.dispose();
        assert!(channel.is_disposed());
        let err = channel.data_stream().await.err().map(|e| e.kind());
        assert_eq!(err, Some(DataChanErrorKind::Disposed));
    }

    #[tokio::test]
    async fn dispose_while_waiting() {
        let channel = std::sync::Arc::new(DataChannel::passive(localhost(), DataChanOptions::default(), &logger()).unwrap());
        let waiting = {
            let channel = channel.clone();
            tokio::spawn(async move { channel.data_stream().await.err().map(|e| e.kind()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        channel.dispose();
        assert_eq!(waiting.await.unwrap(), Some(DataChanErrorKind::Disposed));
    }

    #[tokio::test]
    async fn stream_can_only_be_taken_once() {
        let channel = DataChannel::passive(localhost(), DataChanOptions::default(), &logger()).unwrap();
        let _peer = TcpStream::connect((Ipv4Addr::LOCALHOST, passive_port(&channel))).await.unwrap();
        assert!(channel.data_stream().await.is_ok());
        let err = channel.data_stream().await.err().map(|e| e.kind());
        assert_eq!(err, Some(DataChanErrorKind::AlreadyTaken));
    }

    #[tokio::test]
    async fn waiting_can_time_out() {
        let options = DataChanOptions {
            connect_timeout: Some(Duration::from_millis(50)),
            ..DataChanOptions::default()
        };
        let channel = DataChannel::passive(localhost(), options, &logger()).unwrap();
        let err = channel.data_stream().await.err().map(|e| e.kind());
        assert_eq!(err, Some(DataChanErrorKind::TimedOut));
    }
}
