//! SftpSession file operations

use std::path::Path;

use sftp_readbuf::error::SftpError;

use super::fixtures::{HOME_DIR, TestSession};

#[tokio::test]
async fn test_home_dir_from_realpath() {
    let env = TestSession::start(&[]).await;
    assert_eq!(env.session.home_dir(), Path::new(HOME_DIR));
}

#[tokio::test]
async fn test_open_missing_file_fails() {
    let env = TestSession::start(&[("/present", b"x")]).await;

    let err = env.session.open(Path::new("/absent")).await.unwrap_err();

    assert!(matches!(err, SftpError::FileOperation(_)));
    assert!(err.to_string().contains("/absent"));
}

#[tokio::test]
async fn test_open_keeps_path() {
    let env = TestSession::start(&[("/data/results.dat", b"1.0 2.0")]).await;

    let file = env.session.open(Path::new("/data/results.dat")).await.unwrap();

    assert_eq!(file.path(), Path::new("/data/results.dat"));
    assert!(format!("{:?}", file).contains("results.dat"));
}

#[tokio::test]
async fn test_file_size() {
    let env = TestSession::start(&[("/data/ten.bin", b"0123456789")]).await;

    let size = env.session.file_size(Path::new("/data/ten.bin")).await.unwrap();

    assert_eq!(size, 10);
}

#[tokio::test]
async fn test_file_size_missing_file_fails() {
    let env = TestSession::start(&[]).await;

    let err = env.session.file_size(Path::new("/nope")).await.unwrap_err();

    assert!(matches!(err, SftpError::FileOperation(_)));
}

#[tokio::test]
async fn test_close_handle() {
    let env = TestSession::start(&[("/f", b"abc")]).await;
    let file = env.session.open(Path::new("/f")).await.unwrap();

    assert!(env.session.close_file(file).await.is_ok());
}
