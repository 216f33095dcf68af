//! Tests for the drain step

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use hexrelay::relay::{drain, DrainEnd};

const IDLE: Duration = Duration::from_millis(200);

/// A connected (local, peer) socket pair
async fn socket_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = TcpStream::connect(addr).await.unwrap();
    let (server, _) = listener.accept().await.unwrap();
    (client, server)
}

#[tokio::test]
async fn test_drain_returns_available_bytes_on_idle() {
    let (mut local, mut peer) = socket_pair().await;

    peer.write_all(b"hello relay").await.unwrap();
    peer.flush().await.unwrap();

    let drained = drain(&mut local, IDLE).await;
    assert_eq!(&drained.bytes[..], b"hello relay");
    assert_eq!(drained.reason, DrainEnd::TimedOut);
}

#[tokio::test]
async fn test_drain_accumulates_across_writes() {
    let (mut local, mut peer) = socket_pair().await;

    tokio::spawn(async move {
        peer.write_all(b"first ").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        peer.write_all(b"second").await.unwrap();
        // Keep the peer open past the drain so close is not the signal
        tokio::time::sleep(Duration::from_secs(1)).await;
    });

    let drained = drain(&mut local, IDLE).await;
    assert_eq!(&drained.bytes[..], b"first second");
    assert_eq!(drained.reason, DrainEnd::TimedOut);
}

#[tokio::test]
async fn test_drain_reports_peer_close() {
    let (mut local, mut peer) = socket_pair().await;

    peer.write_all(b"bye").await.unwrap();
    drop(peer);

    let drained = drain(&mut local, IDLE).await;
    assert_eq!(&drained.bytes[..], b"bye");
    assert_eq!(drained.reason, DrainEnd::PeerClosed);
}

#[tokio::test]
async fn test_drain_with_silent_peer_is_empty() {
    let (mut local, _peer) = socket_pair().await;

    let start = std::time::Instant::now();
    let drained = drain(&mut local, IDLE).await;

    assert!(drained.is_empty());
    assert_eq!(drained.reason, DrainEnd::TimedOut);
    assert!(start.elapsed() >= IDLE);
}

#[tokio::test]
async fn test_drain_handles_more_than_one_chunk() {
    let (mut local, mut peer) = socket_pair().await;

    let payload = vec![0xA5u8; 10_000];
    let to_send = payload.clone();
    tokio::spawn(async move {
        peer.write_all(&to_send).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
    });

    let drained = drain(&mut local, IDLE).await;
    assert_eq!(drained.len(), payload.len());
    assert_eq!(&drained.bytes[..], &payload[..]);
}
