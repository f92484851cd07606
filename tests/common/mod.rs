//! Shared harness: an in-memory gateway on an ephemeral port and a small
//! JSON WebSocket client.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use pairing_gateway::app_state::AppState;
use pairing_gateway::config::GatewayConfig;
use pairing_gateway::persistence::Store;
use pairing_gateway::persistence::memory::InMemoryStore;
use pairing_gateway::server::build_app;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for an expected frame.
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a client must stay quiet to count as "received nothing".
const SILENCE: Duration = Duration::from_millis(200);

/// Starts a gateway backed by [`InMemoryStore`] and returns its address.
pub async fn start_server() -> SocketAddr {
    let config = GatewayConfig::default();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let app = build_app(AppState::new(store, &config), &config);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    addr
}

/// One test client speaking the JSON event protocol.
pub struct Client {
    /// Identifier used in the connect URL.
    pub id: String,
    tx: SplitSink<Socket, Message>,
    rx: SplitStream<Socket>,
}

impl Client {
    /// Opens `/ws/{id}`.
    pub async fn connect(addr: SocketAddr, id: &str) -> Self {
        let url = format!("ws://{addr}/ws/{id}");
        let (socket, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("websocket handshake");
        let (tx, rx) = socket.split();
        Self {
            id: id.to_string(),
            tx,
            rx,
        }
    }

    /// Sends a JSON event.
    pub async fn send(&mut self, event: Value) {
        self.send_raw(&event.to_string()).await;
    }

    /// Sends an arbitrary text frame.
    pub async fn send_raw(&mut self, text: &str) {
        self.tx
            .send(Message::text(text))
            .await
            .expect("send frame");
    }

    /// Receives the next JSON event, failing the test on timeout or close.
    pub async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.rx.next())
                .await
                .unwrap_or_else(|_| panic!("{} timed out waiting for an event", self.id));
            match frame {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).expect("server sends JSON");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                other => panic!("{} expected a text event, got {other:?}", self.id),
            }
        }
    }

    /// Receives the next event and checks its `type`.
    pub async fn expect(&mut self, kind: &str) -> Value {
        let event = self.recv().await;
        assert_eq!(
            event.get("type").and_then(Value::as_str),
            Some(kind),
            "{} got unexpected event {event}",
            self.id
        );
        event
    }

    /// Asserts that no event arrives for a short while.
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(SILENCE, self.rx.next()).await
        {
            panic!("{} expected silence, got {}", self.id, text.as_str());
        }
    }

    /// Waits for the server to close the socket and returns the close frame.
    pub async fn expect_close(&mut self) -> Option<CloseFrame> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.rx.next())
                .await
                .unwrap_or_else(|_| panic!("{} timed out waiting for close", self.id));
            match frame {
                Some(Ok(Message::Close(frame))) => return frame,
                Some(Ok(Message::Text(text))) => {
                    panic!("{} expected close, got {}", self.id, text.as_str())
                }
                Some(Ok(_)) => {}
                None | Some(Err(_)) => return None,
            }
        }
    }

    /// Sends `ready` and waits for the immediate reply.
    pub async fn ready(&mut self, interests: &[&str]) -> Value {
        self.send(serde_json::json!({"type": "ready", "interests": interests}))
            .await;
        self.recv().await
    }

    /// Closes the socket from the client side.
    pub async fn close(mut self) {
        let _ = self.tx.send(Message::Close(None)).await;
    }
}

/// Connects two clients and pairs them. Returns `(first, second, room_id)`.
pub async fn paired(addr: SocketAddr, a: &str, b: &str) -> (Client, Client, String) {
    let mut first = Client::connect(addr, a).await;
    let mut second = Client::connect(addr, b).await;
    assert_eq!(first.ready(&[]).await.get("type"), Some(&Value::from("waiting")));
    let paired = second.ready(&[]).await;
    assert_eq!(paired.get("type"), Some(&Value::from("paired")));
    let room_id = paired
        .get("room_id")
        .and_then(Value::as_str)
        .expect("paired carries room_id")
        .to_string();
    first.expect("paired").await;
    (first, second, room_id)
}

/// Fetches `/api/stats`.
pub async fn stats(addr: SocketAddr) -> Value {
    reqwest::get(format!("http://{addr}/api/stats"))
        .await
        .expect("stats request")
        .json()
        .await
        .expect("stats JSON")
}
