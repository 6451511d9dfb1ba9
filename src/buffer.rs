//! A growable byte accumulator for the control channel framer.

use crate::encoding::TextEncoding;
use bytes::{Buf, BytesMut};
use std::ops::Range;
use thiserror::Error;

/// The capacity a [`GrowableBuffer`] starts with and returns to when cleared.
pub const BASELINE_CAPACITY: usize = 1024;

/// Returned by [`GrowableBuffer::trim_end`] when asked to drop more bytes than it holds.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot trim {requested} bytes from a buffer holding {len}")]
pub struct TrimError {
    /// The number of bytes the caller asked to trim
    pub requested: usize,
    /// The number of bytes the buffer held
    pub len: usize,
}

/// Accumulates bytes read from a socket until the framer finds a complete line in them.
///
/// Storage doubles whenever an append does not fit and shrinks back to [`BASELINE_CAPACITY`] on
/// [`clear`](GrowableBuffer::clear), so one very long command does not pin memory for the rest
/// of the session.
#[derive(Debug)]
pub struct GrowableBuffer {
    bytes: BytesMut,
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        GrowableBuffer::new()
    }
}

impl GrowableBuffer {
    /// Creates an empty buffer with the baseline capacity.
    pub fn new() -> Self {
        GrowableBuffer {
            bytes: BytesMut::with_capacity(BASELINE_CAPACITY),
        }
    }

    /// The number of bytes currently held.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The size of the backing storage.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// A view on the bytes currently held.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Appends `data`, doubling the backing storage until it fits.
    pub fn append(&mut self, data: &[u8]) {
        let required = self.bytes.len() + data.len();
        if required > self.bytes.capacity() {
            let mut capacity = self.bytes.capacity().max(BASELINE_CAPACITY);
            while capacity < required {
                capacity *= 2;
            }
            self.bytes.reserve(capacity - self.bytes.len());
        }
        self.bytes.extend_from_slice(data);
    }

    /// Returns `true` if the held bytes end with `sequence`.
    pub fn ends_with(&self, sequence: &[u8]) -> bool {
        self.bytes.ends_with(sequence)
    }

    /// Returns the position of the first occurrence of `sequence`, or [`len`](GrowableBuffer::len)
    /// if it does not occur.
    pub fn index_of(&self, sequence: &[u8]) -> usize {
        if sequence.is_empty() {
            return 0;
        }
        self.bytes
            .windows(sequence.len())
            .position(|window| window == sequence)
            .unwrap_or(self.bytes.len())
    }

    /// Drops the last `n` bytes.
    pub fn trim_end(&mut self, n: usize) -> Result<(), TrimError> {
        let len = self.bytes.len();
        if n > len {
            return Err(TrimError { requested: n, len });
        }
        self.bytes.truncate(len - n);
        Ok(())
    }

    /// Drops the first `n` bytes (or everything if `n` exceeds the length). Clears the buffer
    /// once nothing is left.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.bytes.len());
        self.bytes.advance(n);
        if self.bytes.is_empty() {
            self.clear();
        }
    }

    /// Empties the buffer and shrinks its storage back to the baseline.
    pub fn clear(&mut self) {
        if self.bytes.capacity() == BASELINE_CAPACITY {
            self.bytes.clear();
        } else {
            self.bytes = BytesMut::with_capacity(BASELINE_CAPACITY);
        }
    }

    /// Decodes the bytes in `range` as text. Returns `None` if the range is out of bounds.
    pub fn decode(&self, range: Range<usize>, encoding: TextEncoding) -> Option<String> {
        self.bytes.get(range).map(|bytes| encoding.decode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grows_by_doubling() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(&[b'x'; 3000]);
        assert_eq!(buffer.len(), 3000);
        assert!(buffer.capacity() >= 3000);
        assert_eq!(buffer.as_bytes(), &[b'x'; 3000][..]);
    }

    #[test]
    fn clear_shrinks_storage() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(&[b'x'; 5000]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() < 5000);
    }

    #[test]
    fn index_of_returns_len_when_absent() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(b"NOOP\r\nPWD");
        assert_eq!(buffer.index_of(b"\r\n"), 4);
        assert_eq!(buffer.index_of(b"\n\n"), buffer.len());
        assert_eq!(buffer.index_of(b"a very long sequence"), buffer.len());
    }

    #[test]
    fn ends_with_and_trim() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(b"USER alice\r\n");
        assert!(buffer.ends_with(b"\r\n"));
        buffer.trim_end(2).unwrap();
        assert_eq!(buffer.as_bytes(), b"USER alice");
        assert_eq!(buffer.trim_end(11), Err(TrimError { requested: 11, len: 10 }));
    }

    #[test]
    fn consume_drops_prefix() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(b"NOOP\r\nPWD\r\n");
        buffer.consume(6);
        assert_eq!(buffer.as_bytes(), b"PWD\r\n");
        buffer.consume(100);
        assert!(buffer.is_empty());
    }

    #[test]
    fn decode_range() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(b"CWD /tmp");
        assert_eq!(buffer.decode(0..3, TextEncoding::Ascii), Some("CWD".to_string()));
        assert_eq!(buffer.decode(4..20, TextEncoding::Ascii), None);
    }
}
