use chat_danmaku::relay::{ChatToRelay, Relay, RelayToOverlay};
use std::time::Duration;

#[test]
fn forwards_chat_lines_to_subscriber() {
    let relay = Relay::spawn().unwrap();
    let rx = relay.subscribe();
    let handle = relay.handle();

    handle.send(ChatToRelay::NewMessageData {
        text: "  hello  ".into(),
    });
    handle.send(ChatToRelay::NewMessageData { text: "   ".into() });
    handle.send(ChatToRelay::NewMessageData {
        text: "world".into(),
    });

    let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(first, RelayToOverlay::AddDanmaku { text: "hello".into() });
    assert_eq!(second, RelayToOverlay::AddDanmaku { text: "world".into() });
    relay.shutdown();
}

#[test]
fn messages_without_subscriber_are_dropped() {
    let relay = Relay::spawn().unwrap();
    let handle = relay.handle();
    handle.send(ChatToRelay::NewMessageData {
        text: "nobody listens".into(),
    });

    let rx = relay.subscribe();
    handle.send(ChatToRelay::NewMessageData {
        text: "after subscribe".into(),
    });
    let got = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(
        got,
        RelayToOverlay::AddDanmaku {
            text: "after subscribe".into()
        }
    );
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    relay.shutdown();
}

#[test]
fn sending_after_shutdown_is_silent() {
    let relay = Relay::spawn().unwrap();
    let handle = relay.handle();
    relay.shutdown();
    handle.send(ChatToRelay::NewMessageData {
        text: "late".into(),
    });
}

#[test]
fn dropped_subscriber_does_not_stop_the_relay() {
    let relay = Relay::spawn().unwrap();
    let handle = relay.handle();
    drop(relay.subscribe());
    handle.send(ChatToRelay::NewMessageData { text: "lost".into() });

    let rx = relay.subscribe();
    handle.send(ChatToRelay::NewMessageData { text: "kept".into() });
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        RelayToOverlay::AddDanmaku { text: "kept".into() }
    );
}
