use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("danmaku.log");

    chat_danmaku::logging::init(true, Some(path.clone()));
    tracing::info!("overlay test line");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("overlay test line"));
    assert!(!contents.contains('\u{1b}'), "file output must not carry ansi codes");
}
