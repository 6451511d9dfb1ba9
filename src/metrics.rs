//! Prometheus counters for sessions, commands, replies and transferred bytes.

use crate::server::controlchan::{Reply, ReplyCode};

use lazy_static::*;
use prometheus::{IntCounter, IntCounterVec, opts, register_int_counter, register_int_counter_vec};

lazy_static! {
    static ref FTP_AUTH_FAILURES: IntCounter = register_int_counter!(opts!("ftp_auth_failures", "Total number of authentication failures.")).unwrap();
    static ref FTP_SESSIONS: IntCounter = register_int_counter!(opts!("ftp_sessions_total", "Total number of FTP sessions.")).unwrap();
    static ref FTP_SENT_BYTES: IntCounter =
        register_int_counter!(opts!("ftp_sent_bytes", "Total number of bytes sent to clients over data connections.")).unwrap();
    static ref FTP_RECEIVED_BYTES: IntCounter =
        register_int_counter!(opts!("ftp_received_bytes", "Total number of bytes received from clients over data connections.")).unwrap();
    static ref FTP_COMMAND_TOTAL: IntCounterVec = register_int_counter_vec!("ftp_command_total", "Total number of commands received.", &["command"]).unwrap();
    static ref FTP_REPLY_TOTAL: IntCounterVec =
        register_int_counter_vec!("ftp_reply_total", "Total number of reply codes server sent to clients.", &["range"]).unwrap();
}

/// Counts a new control connection.
pub fn inc_session() {
    FTP_SESSIONS.inc();
}

/// Counts a failed login.
pub fn inc_auth_failure() {
    FTP_AUTH_FAILURES.inc();
}

/// Counts a received command by its (upper cased) name.
pub fn add_command_metric(name: &str) {
    FTP_COMMAND_TOTAL.with_label_values(&[&name.to_ascii_lowercase()]).inc();
}

/// Counts a reply by the class of its code.
pub fn add_reply_metric(reply: &Reply) {
    if let Some(code) = reply.code() {
        add_replycode_metric(code);
    }
}

fn add_replycode_metric(code: ReplyCode) {
    let range = format!("{}xx", code as u32 / 100 % 10);
    FTP_REPLY_TOTAL.with_label_values(&[&range]).inc();
}

/// Counts bytes sent to a client over a data connection.
pub fn add_sent_bytes(bytes: u64) {
    FTP_SENT_BYTES.inc_by(bytes);
}

/// Counts bytes received from a client over a data connection.
pub fn add_received_bytes(bytes: u64) {
    FTP_RECEIVED_BYTES.inc_by(bytes);
}
