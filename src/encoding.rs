//! Text encodings used on the control channel.

use derive_more::Display;

/// The encoding used to turn command arguments and reply text into bytes and back.
///
/// The control channel itself always speaks [`TextEncoding::Ascii`]. Path arguments start out as
/// ASCII too and can be switched to UTF-8 by the client with `OPTS UTF8 ON`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// 7-bit ASCII. Bytes and characters outside of it are replaced with `?`.
    #[default]
    #[display("ASCII")]
    Ascii,
    /// UTF-8. Invalid byte sequences are replaced with U+FFFD when decoding.
    #[display("UTF-8")]
    Utf8,
}

const REPLACEMENT: u8 = b'?';

impl TextEncoding {
    /// Decodes the given bytes to text.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Ascii => bytes.iter().map(|&b| if b.is_ascii() { b as char } else { REPLACEMENT as char }).collect(),
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Encodes the given text to bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Ascii => text.chars().map(|c| if c.is_ascii() { c as u8 } else { REPLACEMENT }).collect(),
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
        }
    }
}
