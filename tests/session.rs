#![allow(missing_docs)]

pub mod common;

use common::{Client, start};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn login_sequence() {
    let server = start().await;
    let mut client = Client::connect(&server).await;

    assert_eq!(client.command("PWD").await, "530 Please authenticate\r\n");
    assert_eq!(client.command("USER nobody").await, "430 Invalid username\r\n");
    assert_eq!(client.command("USER test").await, "331 User name okay, need password\r\n");
    assert_eq!(client.command("PASS wrong").await, "530 Not logged in\r\n");
    assert_eq!(client.command("PWD").await, "530 Please authenticate\r\n");
    assert_eq!(client.command("USER test").await, "331 User name okay, need password\r\n");
    assert_eq!(client.command("PASS test").await, "230 User logged in, proceed\r\n");
    assert_eq!(client.command("PWD").await, "257 \"/\"\r\n");
}

#[tokio::test]
async fn navigation() {
    let server = start().await;
    let mut client = Client::logged_in(&server).await;

    assert_eq!(client.command("CWD pub").await, "250 File action okay\r\n");
    assert_eq!(client.command("XPWD").await, "257 \"/pub\"\r\n");
    assert_eq!(client.command("CWD missing").await, "550 File unavailable\r\n");
    assert_eq!(client.command("PWD").await, "257 \"/pub\"\r\n");
    assert_eq!(client.command("CDUP").await, "250 File action okay\r\n");
    assert_eq!(client.command("PWD").await, "257 \"/\"\r\n");
    assert_eq!(client.command("CDUP").await, "550 File unavailable\r\n");
}

#[tokio::test]
async fn directories() {
    let server = start().await;
    let mut client = Client::logged_in(&server).await;

    assert_eq!(client.command("MKD uploads").await, "257 \"/uploads\"\r\n");
    assert_eq!(client.command("MKD uploads").await, "550 File unavailable\r\n");
    assert_eq!(client.command("RMD pub").await, "550 File unavailable\r\n");
    assert_eq!(client.command("RMD uploads").await, "250 File action okay\r\n");
    assert_eq!(client.command("DELE pub/readme.txt").await, "250 File action okay\r\n");
    assert_eq!(client.command("DELE pub/readme.txt").await, "550 File unavailable\r\n");
}

#[tokio::test]
async fn settings_and_info() {
    let server = start().await;
    let mut client = Client::logged_in(&server).await;

    assert_eq!(client.command("SYST").await, "215 UNIX Type: L8\r\n");
    assert_eq!(client.command("TYPE A").await, "200 Switching to ASCII mode\r\n");
    assert_eq!(client.command("SIZE pub/readme.txt").await, "550 File unavailable\r\n");
    assert_eq!(client.command("TYPE I").await, "200 Switching to Binary mode\r\n");
    assert_eq!(client.command("SIZE pub/readme.txt").await, "213 14\r\n");
    assert_eq!(client.command("MODE S").await, "200 Using Stream transfer mode\r\n");
    assert_eq!(client.command("STRU F").await, "200 In File structure mode\r\n");
    assert_eq!(client.command("OPTS UTF8 ON").await, "200 OK\r\n");
    assert_eq!(client.command("NOOP").await, "200 Successfully did nothing\r\n");
    assert_eq!(client.command("ALLO 100").await, "202 Allocation not necessary\r\n");
}

#[tokio::test]
async fn unknown_commands() {
    let server = start().await;
    let mut client = Client::connect(&server).await;

    assert_eq!(client.command("SITE HELP").await, "502 Command not implemented\r\n");
    assert_eq!(client.command("").await, "502 Command not implemented\r\n");
}

#[tokio::test]
async fn reinitialize_and_quit() {
    let server = start().await;
    let mut client = Client::logged_in(&server).await;

    assert_eq!(client.command("CWD pub").await, "250 File action okay\r\n");
    assert_eq!(client.command("REIN").await, "220 Service ready for new user\r\n");
    assert_eq!(client.command("PWD").await, "530 Please authenticate\r\n");
    assert_eq!(client.command("QUIT").await, "221 Bye!\r\n");
    assert_eq!(client.read_line().await, "");
}
