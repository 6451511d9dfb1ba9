#![allow(dead_code, missing_docs)]

use chrono::Utc;
use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    sync::Arc,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};
use zeptoftp::{ServerBuilder, auth::FtpUser, storage::MemoryFileSystem};

pub const GREETING: &str = "Welcome test";

/// A running server with the account `test`/`test` on an in-memory file system.
pub struct TestServer {
    pub addr: SocketAddr,
    pub fs: MemoryFileSystem,
}

pub async fn start() -> TestServer {
    let fs = MemoryFileSystem::new();
    fs.insert_file("/pub/readme.txt", "Read me first\n", Utc::now());
    let user = FtpUser::new("test", "test", Arc::new(fs.clone()));
    let server = ServerBuilder::new(vec![user])
        .greeting(GREETING)
        .logger(slog::Logger::root(slog::Discard, slog::o!()))
        .build()
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));
    TestServer { addr, fs }
}

/// The client side of a control connection, reading replies line by line.
pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    pub async fn connect(server: &TestServer) -> Client {
        let (reader, writer) = TcpStream::connect(server.addr).await.unwrap().into_split();
        let mut client = Client {
            reader: BufReader::new(reader),
            writer,
        };
        assert_eq!(client.read_line().await, format!("220 {}\r\n", GREETING));
        client
    }

    pub async fn logged_in(server: &TestServer) -> Client {
        let mut client = Client::connect(server).await;
        assert_eq!(client.command("USER test").await, "331 User name okay, need password\r\n");
        assert_eq!(client.command("PASS test").await, "230 User logged in, proceed\r\n");
        client
    }

    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(format!("{}\r\n", line).as_bytes()).await.unwrap();
    }

    pub async fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        line
    }

    /// Sends a command and returns the first line of the reply.
    pub async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_line().await
    }

    /// Enters passive mode and connects to the advertised data port.
    pub async fn pasv(&mut self) -> TcpStream {
        let reply = self.command("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        let addr = parse_pasv(&reply);
        assert_eq!(*addr.ip(), Ipv4Addr::LOCALHOST);
        TcpStream::connect(addr).await.unwrap()
    }
}

pub fn parse_pasv(reply: &str) -> SocketAddrV4 {
    let start = reply.find('(').unwrap() + 1;
    let end = reply.find(')').unwrap();
    let nums: Vec<u8> = reply[start..end].split(',').map(|n| n.parse().unwrap()).collect();
    let ip = Ipv4Addr::new(nums[0], nums[1], nums[2], nums[3]);
    SocketAddrV4::new(ip, u16::from(nums[4]) * 256 + u16::from(nums[5]))
}

pub async fn read_all(mut data: TcpStream) -> Vec<u8> {
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    received
}
