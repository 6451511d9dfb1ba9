//! The most basic usage

use zeptoftp::{ServerBuilder, auth::FtpUser};
use zeptoftp_sbe_fs::FtpUserExt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    pretty_env_logger::init();

    let addr = "127.0.0.1:2121";
    let root = std::env::temp_dir();
    let user = FtpUser::with_fs("alice", "secret", root).unwrap();
    let server = ServerBuilder::new(vec![user]).build().unwrap();

    println!("Starting ftp server on {}", addr);
    server.listen(addr).await.unwrap();
}
