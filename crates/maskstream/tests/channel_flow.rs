//! End-to-end channel scenarios over the in-memory ledger.

use std::sync::Arc;
use std::time::Duration;

use maskstream::{MamChannel, MamConfig, RootSecret};
use maskstream_channel::PollOutcome;
use maskstream_ledger::MemoryLedger;

fn test_channel(window_size: u64) -> MamChannel<MemoryLedger> {
    let mut config = MamConfig::default();
    config.publisher.window_size = window_size;
    config.subscriber.poll_interval = Duration::from_millis(10);
    MamChannel::open(
        RootSecret::from_bytes([0x42; 32]),
        Arc::new(MemoryLedger::new()),
        config,
    )
    .unwrap()
}

#[tokio::test]
async fn hello_world_roundtrip_then_blocks() {
    let channel = test_channel(4);
    let mut publisher = channel.publisher().unwrap();

    publisher.publish(b"hello").await.unwrap();
    publisher.publish(b"world").await.unwrap();

    let mut subscriber = channel.subscriber(channel.initial_key());
    assert_eq!(subscriber.next_message().await.payload.as_ref(), b"hello");
    assert_eq!(subscriber.next_message().await.payload.as_ref(), b"world");

    // Nothing further published: the loop keeps polling with no output.
    let blocked =
        tokio::time::timeout(Duration::from_millis(100), subscriber.next_message()).await;
    assert!(blocked.is_err(), "subscriber must block, not emit or exit");
}

#[tokio::test]
async fn chain_following_across_window_rotations() {
    // window_size 1: every message lives in its own window, so each
    // publish rotates and every envelope announces a new next root.
    let channel = test_channel(1);
    let mut publisher = channel.publisher().unwrap();

    let mut receipts = Vec::new();
    for payload in [&b"m0"[..], b"m1", b"m2"] {
        receipts.push(publisher.publish(payload).await.unwrap());
    }
    // Each receipt's next root is the following receipt's root.
    assert_eq!(receipts[0].next_root, receipts[1].root);
    assert_eq!(receipts[1].next_root, receipts[2].root);

    let mut subscriber = channel.subscriber(channel.initial_key());
    for (i, receipt) in receipts.iter().enumerate() {
        let message = subscriber.next_message().await;
        assert_eq!(message.payload.as_ref(), format!("m{}", i).as_bytes());
        assert_eq!(message.root, receipt.root);
        assert_eq!(message.next_root, receipt.next_root);
    }

    // Cursor rests at the last message's (root, next_root) pair.
    assert_eq!(subscriber.cursor().root, Some(receipts[2].root));
    assert_eq!(subscriber.cursor().next_root, Some(receipts[2].next_root));
}

#[tokio::test]
async fn late_subscriber_catches_up_in_order() {
    let channel = test_channel(4);
    let mut publisher = channel.publisher().unwrap();
    for i in 0..10u32 {
        publisher.publish(format!("msg-{}", i).as_bytes()).await.unwrap();
    }

    let mut subscriber = channel.subscriber(channel.initial_key());
    for i in 0..10u32 {
        let message = subscriber.next_message().await;
        assert_eq!(message.payload.as_ref(), format!("msg-{}", i).as_bytes());
    }
}

#[tokio::test]
async fn mid_stream_key_joins_from_that_index() {
    let channel = test_channel(4);
    let mut publisher = channel.publisher().unwrap();
    for i in 0..6u32 {
        publisher.publish(format!("msg-{}", i).as_bytes()).await.unwrap();
    }

    // A subscriber handed key_at(3) sees messages 3.. and nothing older.
    let mut subscriber = channel.subscriber(channel.key_at(3));
    for i in 3..6u32 {
        let message = subscriber.next_message().await;
        assert_eq!(message.payload.as_ref(), format!("msg-{}", i).as_bytes());
    }
}

#[tokio::test]
async fn no_index_reuse_across_restart_with_submit_faults() {
    let ledger = Arc::new(MemoryLedger::new());
    let mut config = MamConfig::default();
    config.subscriber.poll_interval = Duration::from_millis(10);
    let channel = MamChannel::open(
        RootSecret::from_bytes([0x24; 32]),
        Arc::clone(&ledger),
        config,
    )
    .unwrap();

    let mut publisher = channel.publisher().unwrap();
    publisher.publish(b"a").await.unwrap();

    // A submit that fails still consumes its index.
    ledger.fail_next_submits(1);
    assert!(publisher.publish(b"dropped").await.is_err());

    // Restarted publisher with a stale index probes past the burned
    // index 0; index 1 was consumed but never written, so it is reused
    // for a fresh payload only because no payload ever reached it.
    let mut restarted = channel.publisher().unwrap();
    let receipt = restarted.publish(b"b").await.unwrap();
    assert_eq!(receipt.index, 1);

    // Every ledger entry decodes to a distinct index.
    assert_eq!(ledger.len(), 2);
}

#[tokio::test]
async fn subscriber_rides_through_transient_faults() {
    let ledger = Arc::new(MemoryLedger::new());
    let mut config = MamConfig::default();
    config.subscriber.poll_interval = Duration::from_millis(10);
    let channel = MamChannel::open(
        RootSecret::from_bytes([0x42; 32]),
        Arc::clone(&ledger),
        config,
    )
    .unwrap();

    let mut publisher = channel.publisher().unwrap();
    publisher.publish(b"eventually").await.unwrap();

    // Two failed fetches before the ledger answers; next_message keeps
    // polling through them and still delivers.
    ledger.fail_next_fetches(2);
    let mut subscriber = channel.subscriber(channel.initial_key());
    let message = subscriber.next_message().await;
    assert_eq!(message.payload.as_ref(), b"eventually");
    assert!(ledger.fetch_count() >= 3);
}

#[tokio::test]
async fn poll_once_reports_pending_without_consuming() {
    let channel = test_channel(4);
    let mut subscriber = channel.subscriber(channel.initial_key());

    assert_eq!(subscriber.poll_once().await, PollOutcome::Pending);
    assert_eq!(subscriber.poll_once().await, PollOutcome::Pending);

    let mut publisher = channel.publisher().unwrap();
    publisher.publish(b"late").await.unwrap();

    assert!(matches!(
        subscriber.poll_once().await,
        PollOutcome::Message(m) if m.payload.as_ref() == b"late"
    ));
}
