use super::*;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn path(p: &str) -> VirtualPath {
    p.parse().unwrap()
}

fn setup() -> (tempfile::TempDir, Filesystem) {
    let root = tempfile::tempdir().unwrap();
    let fs = Filesystem::new(root.path()).unwrap();
    (root, fs)
}

#[test]
fn relative_paths() {
    assert_eq!(relative(&path("/")), PathBuf::from("."));
    assert_eq!(relative(&path("/pub/docs")), PathBuf::from("pub").join("docs"));
}

#[tokio::test]
async fn fs_item() {
    let (root, fs) = setup();
    std::fs::write(root.path().join("hello.txt"), b"hello").unwrap();
    let modified = std::fs::metadata(root.path().join("hello.txt")).unwrap().modified().unwrap();

    let item = fs.item(&path("/hello.txt")).await.unwrap().unwrap();
    assert_eq!(item, FileSystemItem::file("hello.txt", 5, DateTime::<Utc>::from(modified)));

    let root_item = fs.item(&path("/")).await.unwrap().unwrap();
    assert!(root_item.is_directory);
    assert_eq!(root_item.name, "/");

    assert_eq!(fs.item(&path("/missing")).await.unwrap(), None);
}

#[tokio::test]
async fn fs_list() {
    let (root, fs) = setup();
    std::fs::write(root.path().join("b.txt"), b"bb").unwrap();
    std::fs::create_dir(root.path().join("a")).unwrap();

    let items = fs.list_items(&path("/")).await.unwrap().unwrap();
    let names: Vec<(&str, bool, u64)> = items.iter().map(|i| (i.name.as_str(), i.is_directory, i.size)).collect();
    assert_eq!(names, vec![("a", true, 0), ("b.txt", false, 2)]);

    assert_eq!(fs.list_items(&path("/b.txt")).await.unwrap(), None);
    assert_eq!(fs.list_items(&path("/nope")).await.unwrap(), None);
}

#[tokio::test]
async fn fs_write_then_read() {
    let (root, fs) = setup();
    let mut writer = fs.write_file(&path("/data.bin")).await.unwrap().unwrap();
    writer.write_all(b"0123456789").await.unwrap();
    writer.shutdown().await.unwrap();
    drop(writer);
    assert_eq!(std::fs::read(root.path().join("data.bin")).unwrap(), b"0123456789");

    let mut reader = fs.read_file(&path("/data.bin")).await.unwrap().unwrap();
    reader.skip_to(6).await.unwrap();
    let mut rest = String::new();
    reader.read_to_string(&mut rest).await.unwrap();
    assert_eq!(rest, "6789");
}

#[tokio::test]
async fn fs_append() {
    let (root, fs) = setup();
    std::fs::write(root.path().join("log.txt"), b"one\n").unwrap();
    let mut writer = fs.append_file(&path("/log.txt")).await.unwrap().unwrap();
    writer.write_all(b"two\n").await.unwrap();
    writer.shutdown().await.unwrap();
    drop(writer);
    assert_eq!(std::fs::read(root.path().join("log.txt")).unwrap(), b"one\ntwo\n");
}

#[tokio::test]
async fn fs_refusals() {
    let (root, fs) = setup();
    std::fs::create_dir(root.path().join("dir")).unwrap();
    std::fs::write(root.path().join("dir/file"), b"x").unwrap();

    assert!(fs.read_file(&path("/dir")).await.unwrap().is_none());
    assert!(fs.write_file(&path("/dir")).await.unwrap().is_none());
    assert!(fs.write_file(&path("/missing/file")).await.unwrap().is_none());
    assert!(!fs.remove_directory(&path("/dir")).await.unwrap());
    assert!(!fs.remove_directory(&path("/")).await.unwrap());
    assert!(!fs.remove_file(&path("/dir")).await.unwrap());
    assert!(!fs.create_directory(&path("/dir")).await.unwrap());
}

#[tokio::test]
async fn fs_directories() {
    let (root, fs) = setup();
    assert!(fs.create_directory(&path("/new")).await.unwrap());
    assert!(fs.directory_exists(&path("/new")).await.unwrap());
    assert!(!fs.file_exists(&path("/new")).await.unwrap());
    assert!(fs.remove_directory(&path("/new")).await.unwrap());
    assert!(!root.path().join("new").exists());
}

#[tokio::test]
async fn fs_rename() {
    let (root, fs) = setup();
    std::fs::write(root.path().join("a.txt"), b"a").unwrap();
    std::fs::write(root.path().join("b.txt"), b"b").unwrap();
    std::fs::create_dir(root.path().join("dir")).unwrap();

    assert!(!fs.rename_file(&path("/a.txt"), &path("/b.txt")).await.unwrap());
    assert!(!fs.rename_file(&path("/dir"), &path("/other")).await.unwrap());
    assert!(fs.rename_file(&path("/a.txt"), &path("/c.txt")).await.unwrap());
    assert!(fs.rename_directory(&path("/dir"), &path("/moved")).await.unwrap());
    assert!(root.path().join("c.txt").is_file());
    assert!(root.path().join("moved").is_dir());
}

#[cfg(unix)]
#[tokio::test]
async fn fs_stays_inside_the_root() {
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret"), b"s").unwrap();
    let (root, fs) = setup();
    std::os::unix::fs::symlink(outside.path(), root.path().join("escape")).unwrap();

    assert!(fs.read_file(&path("/escape/secret")).await.unwrap().is_none());
}
