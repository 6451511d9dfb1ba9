use super::{Reply, error::ControlChanError};
use crate::{buffer::GrowableBuffer, encoding::TextEncoding};

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

// Separates the command token from its arguments.
const SEPARATOR: u8 = b' ';

/// A command as received from the client: the command token and the raw argument bytes, which
/// the command decodes itself since path arguments may use a different encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Bytes,
}

// FtpCodec implements tokio's `Decoder` and `Encoder` traits for the control channel, that we'll
// use to frame FTP commands and encode their replies.
//
// Incoming bytes are moved into a GrowableBuffer. Every complete line found in it becomes a
// CommandLine, so the lines produced do not depend on how the client's bytes were chunked.
#[derive(Debug)]
pub struct FtpCodec {
    buffer: GrowableBuffer,
    line_terminator: Bytes,
    control_encoding: TextEncoding,
}

impl FtpCodec {
    pub fn new(line_terminator: Bytes, control_encoding: TextEncoding) -> Self {
        FtpCodec {
            buffer: GrowableBuffer::new(),
            line_terminator,
            control_encoding,
        }
    }

    fn next_line(&mut self) -> Option<CommandLine> {
        let line_end = self.buffer.index_of(&self.line_terminator);
        if line_end == self.buffer.len() {
            return None;
        }
        let line = &self.buffer.as_bytes()[..line_end];
        let (name_end, args) = match line.iter().position(|b| *b == SEPARATOR) {
            Some(pos) => (pos, Bytes::copy_from_slice(&line[pos + 1..])),
            None => (line_end, Bytes::new()),
        };
        let name = self.buffer.decode(0..name_end, self.control_encoding).unwrap_or_default();
        self.buffer.consume(line_end + self.line_terminator.len());
        Some(CommandLine { name, args })
    }
}

impl Decoder for FtpCodec {
    type Item = CommandLine;
    type Error = ControlChanError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<CommandLine>, Self::Error> {
        if !buf.is_empty() {
            self.buffer.append(&buf.split());
        }
        Ok(self.next_line())
    }
}

impl Encoder<Reply> for FtpCodec {
    type Error = ControlChanError;

    // Here we encode the outgoing reply followed by the line terminator
    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        if let Reply::None = reply {
            return Ok(());
        }
        reply.encode(self.control_encoding, &self.line_terminator, buf);
        buf.extend_from_slice(&self.line_terminator);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::controlchan::ReplyCode;
    use pretty_assertions::assert_eq;

    fn codec() -> FtpCodec {
        FtpCodec::new(Bytes::from_static(b"\r\n"), TextEncoding::Ascii)
    }

    fn decode_chunks(chunks: &[&[u8]]) -> Vec<CommandLine> {
        let mut codec = codec();
        let mut lines = vec![];
        for chunk in chunks {
            let mut buf = BytesMut::from(*chunk);
            while let Some(line) = codec.decode(&mut buf).unwrap() {
                lines.push(line);
            }
        }
        lines
    }

    fn line(name: &str, args: &[u8]) -> CommandLine {
        CommandLine {
            name: name.to_string(),
            args: Bytes::copy_from_slice(args),
        }
    }

    #[test]
    fn splits_name_and_args_at_first_space() {
        let lines = decode_chunks(&[b"STOR my file.txt\r\n"]);
        assert_eq!(lines, vec![line("STOR", b"my file.txt")]);
    }

    #[test]
    fn no_args() {
        assert_eq!(decode_chunks(&[b"PWD\r\n"]), vec![line("PWD", b"")]);
    }

    #[test]
    fn waits_for_the_terminator() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&b"NOOP\r"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        let mut buf = BytesMut::from(&b"\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(line("NOOP", b"")));
    }

    #[test]
    fn chunking_does_not_change_the_lines() {
        let input: &[u8] = b"USER alice\r\nPASS s3cr3t\r\nCWD /a b\r\nNOOP\r\n";
        let whole = decode_chunks(&[input]);
        assert_eq!(whole.len(), 4);
        for chunk_size in 1..input.len() {
            let chunks: Vec<&[u8]> = input.chunks(chunk_size).collect();
            assert_eq!(decode_chunks(&chunks), whole, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn keeps_raw_argument_bytes() {
        let lines = decode_chunks(&[b"RETR caf\xc3\xa9.txt\r\n"]);
        assert_eq!(lines[0].args.as_ref(), b"caf\xc3\xa9.txt");
    }

    #[test]
    fn encode_appends_terminator() {
        let mut codec = codec();
        let mut buf = BytesMut::new();
        codec.encode(Reply::new(ReplyCode::ServiceReady, "Welcome"), &mut buf).unwrap();
        codec.encode(Reply::none(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"220 Welcome\r\n");
    }
}
