//! A stream wrapper that logs the bytes flowing through a data connection.

use crate::encoding::TextEncoding;
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

// Logs every chunk read or written at debug level, decoded as ASCII.
#[derive(Debug)]
pub(crate) struct TracingStream<S> {
    inner: S,
    logger: slog::Logger,
}

impl<S> TracingStream<S> {
    pub(crate) fn new(inner: S, logger: slog::Logger) -> Self {
        TracingStream { inner, logger }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for TracingStream<S> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let result = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = result {
            let read = &buf.filled()[before..];
            if !read.is_empty() {
                let text = TextEncoding::Ascii.decode(read);
                slog::debug!(this.logger, "Data channel read"; "bytes" => read.len(), "text" => text);
            }
        }
        result
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for TracingStream<S> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let result = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(written)) = result {
            let text = TextEncoding::Ascii.decode(&buf[..written]);
            slog::debug!(this.logger, "Data channel write"; "bytes" => written, "text" => text);
        }
        result
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
