//! ReadBuffer over a real SFTP client session

use std::future::Future;
use std::path::Path;
use std::pin::pin;
use std::task::{Context, Waker};

use russh_sftp::client::error::Error as RusshSftpError;
use russh_sftp::protocol::StatusCode;
use sftp_readbuf::config::ReadSettings;
use sftp_readbuf::{DEFAULT_CAPACITY, ReadBuffer};

use super::fixtures::{DENIED_PREFIX, TestSession};

const TEN_BYTES: &[u8] = b"0123456789";

/// Ten-byte file: full read, then a read past the end
#[tokio::test]
async fn test_read_whole_file_then_eof() {
    let env = TestSession::start(&[("/data/ten.bin", TEN_BYTES)]).await;
    let mut file = env.session.open(Path::new("/data/ten.bin")).await.unwrap();
    let mut reader = ReadBuffer::new(env.session.as_ref());

    assert_eq!(reader.capacity(), DEFAULT_CAPACITY);

    let read = reader.read_into(&mut file, 0, 10).await.unwrap();
    assert_eq!(read, 10);
    assert_eq!(&reader.buffer()[..10], TEN_BYTES);

    let read = reader.read_into(&mut file, 10, 10).await.unwrap();
    assert_eq!(read, 0);
}

#[tokio::test]
async fn test_single_read_issues_one_request() {
    let env = TestSession::start(&[("/data/ten.bin", TEN_BYTES)]).await;
    let mut file = env.session.open(Path::new("/data/ten.bin")).await.unwrap();
    let mut reader = ReadBuffer::new(env.session.as_ref());

    let before = env.read_requests();
    reader.read_into(&mut file, 2, 5).await.unwrap();

    assert_eq!(env.read_requests() - before, 1);
    assert_eq!(&reader.buffer()[..5], b"23456");
}

#[tokio::test]
async fn test_read_into_start_matches_offset_zero() {
    let env = TestSession::start(&[("/data/ten.bin", TEN_BYTES)]).await;
    let mut file = env.session.open(Path::new("/data/ten.bin")).await.unwrap();
    let mut reader = ReadBuffer::new(env.session.as_ref());

    // Move away from the start first so the position is not already 0
    reader.read_into(&mut file, 6, 4).await.unwrap();

    let read = reader.read_into_start(&mut file, 4).await.unwrap();
    assert_eq!(read, 4);
    assert_eq!(&reader.buffer()[..4], b"0123");
}

#[tokio::test]
async fn test_length_over_capacity_is_clamped() {
    let data = vec![7u8; 100];
    let env = TestSession::start(&[("/data/big.bin", data.as_slice())]).await;
    let mut file = env.session.open(Path::new("/data/big.bin")).await.unwrap();
    let mut reader = ReadBuffer::with_capacity(env.session.as_ref(), 32);

    let read = reader.read_into(&mut file, 0, 100).await.unwrap();

    assert!(read <= 32);
    assert!(read > 0);
}

#[tokio::test]
async fn test_sequential_chunks_reassemble_file() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let env = TestSession::start(&[("/data/series.bin", data.as_slice())]).await;
    let mut file = env.session.open(Path::new("/data/series.bin")).await.unwrap();
    let settings = ReadSettings { capacity: 1024 };
    let mut reader = ReadBuffer::from_settings(env.session.as_ref(), &settings).unwrap();

    let mut out = Vec::new();
    loop {
        let chunk = reader
            .read_chunk(&mut file, out.len() as u64, 1024)
            .await
            .unwrap();
        if chunk.is_empty() {
            break;
        }
        out.extend_from_slice(chunk);
    }

    assert_eq!(out, data);
}

#[tokio::test]
async fn test_fill_reads_requested_span() {
    let data: Vec<u8> = (0..5_000u32).map(|i| (i % 7) as u8).collect();
    let env = TestSession::start(&[("/data/fill.bin", data.as_slice())]).await;
    let mut file = env.session.open(Path::new("/data/fill.bin")).await.unwrap();
    let mut reader = ReadBuffer::with_capacity(env.session.as_ref(), 4096);

    let filled = reader.fill(&mut file, 1000, 4096).await.unwrap();

    assert_eq!(filled, 4000);
    assert_eq!(&reader.buffer()[..4000], &data[1000..]);
}

#[tokio::test]
async fn test_two_adapters_on_one_session() {
    let env = TestSession::start(&[("/a", b"AAAA"), ("/b", b"BBBB")]).await;
    let mut file_a = env.session.open(Path::new("/a")).await.unwrap();
    let mut file_b = env.session.open(Path::new("/b")).await.unwrap();

    let mut reader_a = ReadBuffer::new(env.session.as_ref());
    let mut reader_b = ReadBuffer::new(env.session.as_ref());

    reader_a.read_into(&mut file_a, 0, 4).await.unwrap();
    reader_b.read_into(&mut file_b, 0, 4).await.unwrap();

    assert_eq!(&reader_a.buffer()[..4], b"AAAA");
    assert_eq!(&reader_b.buffer()[..4], b"BBBB");
}

#[tokio::test]
async fn test_closing_one_handle_leaves_others_readable() {
    let env = TestSession::start(&[("/data/ten.bin", TEN_BYTES)]).await;
    let file = env.session.open(Path::new("/data/ten.bin")).await.unwrap();
    let mut other = env.session.open(Path::new("/data/ten.bin")).await.unwrap();
    let mut reader = ReadBuffer::new(env.session.as_ref());

    env.session.close_file(file).await.unwrap();

    assert_eq!(reader.read_into(&mut other, 0, 3).await.unwrap(), 3);
}

#[tokio::test]
async fn test_abandoned_read_does_not_affect_next_read() {
    let env = TestSession::start(&[("/data/ten.bin", TEN_BYTES)]).await;
    let mut file = env.session.open(Path::new("/data/ten.bin")).await.unwrap();
    let mut reader = ReadBuffer::new(env.session.as_ref());

    // Send the request, then drop it before the reply arrives
    {
        let mut pending = pin!(reader.read_into(&mut file, 0, 10));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(pending.as_mut().poll(&mut cx).is_pending());
    }

    let read = reader.read_into(&mut file, 6, 3).await.unwrap();
    assert_eq!(read, 3);
    assert_eq!(&reader.buffer()[..3], b"678");

    let read = reader.read_into(&mut file, 0, 3).await.unwrap();
    assert_eq!(read, 3);
    assert_eq!(&reader.buffer()[..3], b"012");
}

#[tokio::test]
async fn test_server_error_propagates_unchanged() {
    let path = format!("{}secret.bin", DENIED_PREFIX);
    let env = TestSession::start(&[(path.as_str(), TEN_BYTES)]).await;
    let mut file = env.session.open(Path::new(&path)).await.unwrap();
    let mut reader = ReadBuffer::new(env.session.as_ref());

    let err = reader.read_into(&mut file, 0, 10).await.unwrap_err();

    match &err {
        RusshSftpError::Status(status) => {
            assert_eq!(status.status_code, StatusCode::PermissionDenied);
        }
        other => panic!("expected a status error, got {:?}", other),
    }
    assert!(err.to_string().contains(&StatusCode::PermissionDenied.to_string()));
    assert_eq!(env.read_requests(), 1);
}
