//! The RFC 959 List (`LIST`) command
//
// This command causes a list to be sent from the server to the
// passive DTP.  If the pathname specifies a directory or other
// group of files, the server should transfer a list of files
// in the specified directory.  If the pathname specifies a
// file then the server should send current information on the
// file.  A null argument implies the user's current working or
// default directory.

use crate::server::controlchan::{
    Reply,
    commands::file_unavailable,
    error::ControlChanError,
    handler::{Command, CommandContext},
    listing::{ListingFormat, items_to_list, send_listing},
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct List;

#[async_trait]
impl Command for List {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        match items_to_list(ctx.session, &args).await? {
            Some(items) => send_listing(ctx, items, ListingFormat::Long).await,
            None => Ok(file_unavailable()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::server::controlchan::commands::testing::Harness;
    use chrono::{TimeDelta, Utc};
    use pretty_assertions::assert_eq;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn lists_the_current_directory() {
        let mut harness = Harness::logged_in();
        harness.fs.insert_file("/run.exe", vec![0u8; 42], Utc::now() - TimeDelta::days(1));
        harness.fs.insert_file("/docs/readme.txt", "hi", Utc::now());
        let mut client = harness.open_passive().await;

        harness.exec("LIST -la").await;

        assert_eq!(harness.lines(), vec!["150 Opening data connection", "226 Transfer complete"]);
        let mut listing = String::new();
        client.read_to_string(&mut listing).await.unwrap();
        let lines: Vec<&str> = listing.split("\r\n").collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("drwxrwxrwx   1 owner    group               0 "), "{}", lines[0]);
        assert!(lines[0].ends_with(" docs"));
        assert!(lines[1].starts_with("-rwxrwxrwx   1 owner    group              42 "), "{}", lines[1]);
        assert!(lines[1].ends_with(" run.exe"));
        assert_eq!(lines[2..], ["", ""]);
        assert!(harness.session.data_channel.is_none());
    }

    #[tokio::test]
    async fn single_file() {
        let mut harness = Harness::logged_in();
        harness.fs.insert_file("/docs/readme.txt", "hi", Utc::now());
        harness.fs.insert_file("/docs/other.txt", "other", Utc::now());
        let mut client = harness.open_passive().await;
        harness.exec("LIST docs/readme.txt").await;
        let mut listing = String::new();
        client.read_to_string(&mut listing).await.unwrap();
        let lines: Vec<&str> = listing.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("-rw-rw-rw-   1 owner    group               2 "), "{}", lines[0]);
        assert!(lines[0].ends_with(" readme.txt"));
        assert_eq!(lines[1..], ["", ""]);
    }

    #[tokio::test]
    async fn single_file_in_the_current_directory() {
        let mut harness = Harness::logged_in();
        harness.fs.insert_file("/somefile.txt", "12345", Utc::now());
        harness.fs.insert_file("/zzz.txt", "z", Utc::now());
        let mut client = harness.open_passive().await;
        harness.exec("LIST somefile.txt").await;
        let mut listing = String::new();
        client.read_to_string(&mut listing).await.unwrap();
        assert_eq!(listing.matches("\r\n").count(), 2);
        assert!(listing.contains(" somefile.txt\r\n"));
        assert!(!listing.contains("zzz.txt"));
        assert_eq!(harness.last_line(), "226 Transfer complete");
    }

    #[tokio::test]
    async fn missing_path() {
        let mut harness = Harness::logged_in();
        let _client = harness.open_passive().await;
        harness.exec("LIST nowhere").await;
        assert_eq!(harness.last_line(), "550 File unavailable");
    }

    #[tokio::test]
    async fn without_data_channel() {
        let mut harness = Harness::logged_in();
        harness.exec("LIST").await;
        assert_eq!(harness.last_line(), "425 Can't open data connection");
    }
}
