//! End-to-end tests driving the relay over real TCP connections.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};

use linechat::{serve, Registry, ServerLine};

/// Bind an ephemeral port and run the relay on it
async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(serve(listener, Registry::new()));
    addr
}

struct TestClient {
    lines: Framed<TcpStream, LinesCodec>,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        Self {
            lines: Framed::new(stream, LinesCodec::new()),
        }
    }

    /// Connect and complete the whole handshake, consuming the join notice
    async fn join(addr: SocketAddr, name: &str) -> Self {
        let mut client = Self::connect(addr).await;
        assert_eq!(client.recv().await, "SUBMITNAME");
        client.send(name).await;
        assert_eq!(client.recv().await, "NAMEACCEPTED");
        assert_eq!(client.recv().await, format!("NEWCLIENT {}", name));
        client
    }

    async fn send(&mut self, line: &str) {
        self.lines.send(line.to_string()).await.expect("send line");
    }

    async fn recv(&mut self) -> String {
        timeout(Duration::from_secs(5), self.lines.next())
            .await
            .expect("timed out waiting for a line")
            .expect("connection closed unexpectedly")
            .expect("line decode failed")
    }
}

#[tokio::test]
async fn test_handshake_and_chat() {
    let addr = start_server().await;

    let mut alice = TestClient::join(addr, "alice").await;
    let mut bob = TestClient::join(addr, "bob").await;

    // Alice hears about bob before chatting, which pins message order below.
    assert_eq!(alice.recv().await, "NEWCLIENT bob");

    alice.send("hi").await;

    // The sender receives its own message too.
    assert_eq!(alice.recv().await, "MESSAGE alice: hi");
    assert_eq!(bob.recv().await, "MESSAGE alice: hi");
}

#[tokio::test]
async fn test_duplicate_name_reprompted_until_unique() {
    let addr = start_server().await;

    let mut alice = TestClient::join(addr, "alice").await;

    let mut carol = TestClient::connect(addr).await;
    assert_eq!(carol.recv().await, "SUBMITNAME");
    carol.send("alice").await;

    // Taken name: no acceptance, just another prompt.
    let reply = carol.recv().await;
    assert_eq!(ServerLine::parse(&reply), Some(ServerLine::SubmitName));

    carol.send("carol").await;
    assert_eq!(carol.recv().await, "NAMEACCEPTED");
    assert_eq!(carol.recv().await, "NEWCLIENT carol");

    assert_eq!(alice.recv().await, "NEWCLIENT carol");
}

#[tokio::test]
async fn test_per_sender_message_order() {
    let addr = start_server().await;

    let mut alice = TestClient::join(addr, "alice").await;
    let mut bob = TestClient::join(addr, "bob").await;
    assert_eq!(alice.recv().await, "NEWCLIENT bob");

    for i in 1..=5 {
        alice.send(&format!("msg {}", i)).await;
    }

    for i in 1..=5 {
        let expected = format!("MESSAGE alice: msg {}", i);
        assert_eq!(bob.recv().await, expected);
        assert_eq!(alice.recv().await, expected);
    }
}

#[tokio::test]
async fn test_broadcast_survives_dropped_peer() {
    let addr = start_server().await;

    let mut alice = TestClient::join(addr, "alice").await;
    let bob = TestClient::join(addr, "bob").await;
    assert_eq!(alice.recv().await, "NEWCLIENT bob");

    let mut carol = TestClient::join(addr, "carol").await;
    assert_eq!(alice.recv().await, "NEWCLIENT carol");

    // Bob vanishes without any protocol goodbye; the server may or may not
    // have noticed by the time alice broadcasts.
    drop(bob);

    alice.send("still here").await;

    assert_eq!(alice.recv().await, "MESSAGE alice: still here");
    assert_eq!(carol.recv().await, "MESSAGE alice: still here");
}

#[tokio::test]
async fn test_name_available_after_disconnect() {
    let addr = start_server().await;

    let alice = TestClient::join(addr, "alice").await;
    drop(alice);

    // The old session unregisters asynchronously, so keep submitting the
    // name until the server accepts it; each rejection is just a re-prompt.
    let mut replacement = TestClient::connect(addr).await;
    assert_eq!(replacement.recv().await, "SUBMITNAME");

    timeout(Duration::from_secs(10), async {
        loop {
            replacement.send("alice").await;
            match ServerLine::parse(&replacement.recv().await) {
                Some(ServerLine::NameAccepted) => break,
                Some(ServerLine::SubmitName) => continue,
                other => panic!("unexpected handshake reply: {:?}", other),
            }
        }
    })
    .await
    .expect("name was never freed");

    assert_eq!(replacement.recv().await, "NEWCLIENT alice");
}
