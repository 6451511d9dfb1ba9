use crate::encoding::TextEncoding;
use bytes::BytesMut;
use std::fmt::Display;

const MULTILINE_END: &str = "End";

/// A reply to the FTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    None,
    CodeAndMsg {
        code: ReplyCode,
        msg: String,
    },
    // Encoded as `CODE-MSG`, one indented line per item and `CODE End`.
    MultiLine {
        code: ReplyCode,
        msg: String,
        items: Vec<String>,
    },
    // The path is quoted and encoded with its own encoding, the rest with the control encoding.
    Path {
        code: ReplyCode,
        path: String,
        encoding: TextEncoding,
    },
}

/// The reply codes according to RFC 959.
//
// From: https://cr.yp.to/ftp/request.html#response
//
// The three digits form a code. Codes between 100 and 199 indicate marks; codes between 200
// and 399 indicate acceptance; codes between 400 and 599 indicate rejection.
//
// The server can reject any request with code
// - 421 if the server is about to close the connection;
// - 500, 501, 502, or 504 for unacceptable syntax; or
// - 530 if permission is denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ReplyCode {
    FileStatusOkay = 150,

    CommandOkay = 200,
    CommandOkayNotImplemented = 202,
    SystemStatus = 211,
    FileStatus = 213,
    SystemType = 215,
    ServiceReady = 220,
    ClosingControlConnection = 221,
    ClosingDataConnection = 226,
    EnteringPassiveMode = 227,
    UserLoggedIn = 230,
    FileActionOkay = 250,
    DirCreated = 257,

    NeedPassword = 331,
    FileActionPending = 350,

    CantOpenDataConnection = 425,
    InvalidUsername = 430,

    InternalServerError = 500,
    ParameterSyntaxError = 501,
    CommandNotImplemented = 502,
    CommandNotImplementedForParameter = 504,
    NotLoggedIn = 530,
    FileError = 550,
    ExceededStorageAllocation = 552,
}

impl Reply {
    pub fn new(code: ReplyCode, message: &str) -> Self {
        Reply::CodeAndMsg {
            code,
            msg: message.to_string(),
        }
    }

    pub fn new_with_string(code: ReplyCode, msg: String) -> Self {
        Reply::CodeAndMsg { code, msg }
    }

    pub fn new_multiline<I>(code: ReplyCode, message: &str, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Reply::MultiLine {
            code,
            msg: message.to_string(),
            items: items.into_iter().map(|item| format!("{}", item)).collect(),
        }
    }

    pub fn new_path<P: Display>(code: ReplyCode, path: P, encoding: TextEncoding) -> Self {
        Reply::Path {
            code,
            path: path.to_string(),
            encoding,
        }
    }

    // A no-reply
    pub fn none() -> Self {
        Reply::None
    }

    pub fn code(&self) -> Option<ReplyCode> {
        match self {
            Reply::None => None,
            Reply::CodeAndMsg { code, .. } | Reply::MultiLine { code, .. } | Reply::Path { code, .. } => Some(*code),
        }
    }

    // The reply as the lines the client will see, for logging.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Reply::None => vec![],
            Reply::CodeAndMsg { code, msg } if msg.is_empty() => vec![format!("{}", *code as u32)],
            Reply::CodeAndMsg { code, msg } => vec![format!("{} {}", *code as u32, msg)],
            Reply::MultiLine { code, msg, items } => {
                let mut lines = Vec::with_capacity(items.len() + 2);
                lines.push(format!("{}-{}", *code as u32, msg));
                lines.extend(items.iter().map(|item| format!(" {}", item)));
                lines.push(format!("{} {}", *code as u32, MULTILINE_END));
                lines
            }
            Reply::Path { code, path, .. } => vec![format!("{} \"{}\"", *code as u32, quote(path))],
        }
    }

    // Writes the encoded reply without the final line terminator.
    pub fn encode(&self, control: TextEncoding, line_terminator: &[u8], buf: &mut BytesMut) {
        match self {
            Reply::Path { code, path, encoding } => {
                buf.extend_from_slice(&control.encode(&format!("{} \"", *code as u32)));
                buf.extend_from_slice(&encoding.encode(&quote(path)));
                buf.extend_from_slice(b"\"");
            }
            _ => {
                for (i, line) in self.lines().iter().enumerate() {
                    if i > 0 {
                        buf.extend_from_slice(line_terminator);
                    }
                    buf.extend_from_slice(&control.encode(line));
                }
            }
        }
    }
}

// RFC 959 Appendix II: a double quote inside a pathname is doubled.
fn quote(path: &str) -> String {
    path.replace('"', "\"\"")
}
