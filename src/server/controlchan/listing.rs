//! Formats directory listings for `LIST` and `NLST`.

use crate::{
    encoding::TextEncoding,
    server::{
        controlchan::{
            Reply,
            error::ControlChanError,
            handler::CommandContext,
            transfer::{Direction, count_bytes, transfer_complete, with_data_stream},
        },
        session::Session,
    },
    storage::FileSystemItem,
};
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use tokio::io::AsyncWriteExt;

// Items modified longer ago than this show the year instead of the time of day.
const RECENT_DAYS: i64 = 180;
const EXECUTABLE_EXTENSION: &str = ".exe";

/// The shape of the listing lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ListingFormat {
    // Unix `ls -l` style records.
    Long,
    // Bare names.
    NamesOnly,
}

/// One `ls -l` style line for an item, relative to `now`.
pub(super) struct Record<'a> {
    item: &'a FileSystemItem,
    now: DateTime<Utc>,
}

impl<'a> Record<'a> {
    pub(super) fn new(item: &'a FileSystemItem, now: DateTime<Utc>) -> Self {
        Record { item, now }
    }

    fn permissions(&self) -> &'static str {
        if self.item.is_directory {
            "drwxrwxrwx"
        } else if self.item.name.to_ascii_lowercase().ends_with(EXECUTABLE_EXTENSION) {
            "-rwxrwxrwx"
        } else {
            "-rw-rw-rw-"
        }
    }

    fn timestamp(&self) -> String {
        let age = (self.now - self.item.modified).abs();
        if age < TimeDelta::days(RECENT_DAYS) {
            self.item.modified.format("%b %d %H:%M").to_string()
        } else {
            self.item.modified.format("%b %d  %Y").to_string()
        }
    }
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{permissions} {links:>3} {owner:<8} {group:<8} {size:>12} {modified} {name}",
            permissions = self.permissions(),
            links = 1,
            owner = "owner",
            group = "group",
            size = self.item.size,
            modified = self.timestamp(),
            name = self.item.name,
        )
    }
}

/// Renders the whole listing: every line followed by the terminator, then a blank line.
pub(super) fn render(items: &[FileSystemItem], format: ListingFormat, now: DateTime<Utc>, encoding: TextEncoding, line_terminator: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(items.len() * 80);
    for item in items {
        let line = match format {
            ListingFormat::Long => Record::new(item, now).to_string(),
            ListingFormat::NamesOnly => item.name.clone(),
        };
        out.extend_from_slice(&encoding.encode(&line));
        out.extend_from_slice(line_terminator);
    }
    out.extend_from_slice(line_terminator);
    out
}

// Drops the leading `-l`, `-a` style options some clients send.
fn strip_options(args: &str) -> &str {
    let mut rest = args.trim_start();
    while rest.starts_with('-') {
        rest = rest.find(' ').map_or("", |space| rest[space..].trim_start());
    }
    rest
}

/// Resolves what a listing shows: the current directory without a path argument, the contents
/// of a directory argument or a file argument by itself. `None` if the path does not exist.
pub(super) async fn items_to_list(session: &Session, args: &str) -> Result<Option<Vec<FileSystemItem>>, ControlChanError> {
    let storage = session.storage()?;
    let argument = strip_options(args);
    let path = if argument.is_empty() {
        session.cwd.clone()
    } else {
        match session.resolve(argument) {
            Some(path) => path,
            None => return Ok(None),
        }
    };
    match storage.item(&path).await? {
        Some(item) if item.is_directory => Ok(storage.list_items(&path).await?),
        Some(item) => Ok(Some(vec![item])),
        None => Ok(None),
    }
}

/// Sends the rendered listing over the data connection.
pub(super) async fn send_listing(ctx: &mut CommandContext<'_>, items: Vec<FileSystemItem>, format: ListingFormat) -> Result<Reply, ControlChanError> {
    let listing = render(&items, format, Utc::now(), ctx.session.path_encoding, &ctx.session.line_terminator);
    let collect_metrics = ctx.session.collect_metrics;
    with_data_stream(ctx, move |mut data| async move {
        data.write_all(&listing).await.map_err(ControlChanError::data_transfer)?;
        data.shutdown().await.map_err(ControlChanError::data_transfer)?;
        count_bytes(collect_metrics, Direction::Sent, listing.len() as u64);
        Ok(transfer_complete())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn recent_executable() {
        let item = FileSystemItem::file("run.exe", 42, now() - TimeDelta::days(10));
        assert_eq!(
            Record::new(&item, now()).to_string(),
            "-rwxrwxrwx   1 owner    group              42 Jun 05 12:00 run.exe"
        );
    }

    #[test]
    fn executable_extension_ignores_case() {
        let item = FileSystemItem::file("SETUP.EXE", 1, now());
        assert!(Record::new(&item, now()).to_string().starts_with("-rwxrwxrwx"));
    }

    #[test]
    fn old_plain_file() {
        let item = FileSystemItem::file("notes.txt", 1024, Utc.with_ymd_and_hms(2020, 1, 2, 9, 15, 0).unwrap());
        assert_eq!(
            Record::new(&item, now()).to_string(),
            "-rw-rw-rw-   1 owner    group            1024 Jan 02  2020 notes.txt"
        );
    }

    #[test]
    fn directory() {
        let item = FileSystemItem::directory("pub", Utc.with_ymd_and_hms(2024, 6, 14, 8, 30, 0).unwrap());
        assert_eq!(
            Record::new(&item, now()).to_string(),
            "drwxrwxrwx   1 owner    group               0 Jun 14 08:30 pub"
        );
    }

    #[test]
    fn names_only_ends_with_blank_line() {
        let items = vec![FileSystemItem::file("a.txt", 1, now()), FileSystemItem::directory("b", now())];
        let rendered = render(&items, ListingFormat::NamesOnly, now(), TextEncoding::Ascii, b"\r\n");
        assert_eq!(rendered, b"a.txt\r\nb\r\n\r\n".to_vec());
    }

    #[test]
    fn empty_listing_is_a_blank_line() {
        let rendered = render(&[], ListingFormat::Long, now(), TextEncoding::Ascii, b"\n");
        assert_eq!(rendered, b"\n".to_vec());
    }

    #[test]
    fn options_are_skipped() {
        assert_eq!(strip_options("-la"), "");
        assert_eq!(strip_options("-l -a pub/docs"), "pub/docs");
        assert_eq!(strip_options("my file.txt"), "my file.txt");
        assert_eq!(strip_options(""), "");
    }

    #[test]
    fn names_use_the_given_encoding() {
        let items = vec![FileSystemItem::file("café", 1, now())];
        assert_eq!(render(&items, ListingFormat::NamesOnly, now(), TextEncoding::Ascii, b"\n"), b"caf?\n\n".to_vec());
        assert_eq!(render(&items, ListingFormat::NamesOnly, now(), TextEncoding::Utf8, b"\n"), "café\n\n".as_bytes().to_vec());
    }
}
