//! Signaling relay: forwards opaque WebRTC and chat payloads to the peer.
//!
//! The relay keeps no state of its own. Peer lookup and delivery happen in
//! one [`MatchEngine`] critical section, so a closed peer transport goes
//! through the normal disconnect cleanup. Chat text is also
//! handed to the [`Store`] on a detached task; a slow or failing store never
//! delays or blocks the forward.

use std::sync::Arc;

use super::MatchEngine;
use crate::domain::{ClientId, Delivery, RoomId};
use crate::persistence::Store;
use crate::persistence::models::StoredMessage;
use crate::ws::messages::ServerMessage;

/// WebRTC signaling payloads relayed verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// SDP offer.
    Offer(serde_json::Value),
    /// SDP answer.
    Answer(serde_json::Value),
    /// ICE candidate.
    IceCandidate(serde_json::Value),
}

impl Signal {
    /// Wire name of the signal kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Offer(_) => "offer",
            Self::Answer(_) => "answer",
            Self::IceCandidate(_) => "ice_candidate",
        }
    }

    fn into_message(self, from: ClientId) -> ServerMessage {
        match self {
            Self::Offer(sdp) => ServerMessage::Offer { sdp, from },
            Self::Answer(sdp) => ServerMessage::Answer { sdp, from },
            Self::IceCandidate(candidate) => ServerMessage::IceCandidate { candidate, from },
        }
    }
}

/// What happened to a relayed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Queued for the peer.
    Forwarded {
        /// Room the sender and peer share.
        room_id: RoomId,
        /// Recipient.
        peer_id: ClientId,
    },
    /// Sender is not paired, or the peer vanished before delivery.
    Dropped,
}

/// Stateless forwarder between the two members of a room.
#[derive(Debug, Clone)]
pub struct SignalingRelay {
    engine: Arc<MatchEngine>,
    store: Arc<dyn Store>,
}

impl SignalingRelay {
    /// Creates a relay over `engine`, logging chat text to `store`.
    #[must_use]
    pub fn new(engine: Arc<MatchEngine>, store: Arc<dyn Store>) -> Self {
        Self { engine, store }
    }

    /// Forwards an offer, answer, or ICE candidate to the sender's peer.
    pub async fn forward_signal(&self, from: &ClientId, signal: Signal) -> RelayOutcome {
        let kind = signal.kind();
        let relayed = self
            .engine
            .relay_to_peer(from, |_, _| signal.into_message(from.clone()))
            .await;
        outcome(from, kind, relayed)
    }

    /// Forwards chat text to the sender's peer and logs it to the store.
    ///
    /// The record is stamped inside the engine's critical section, so
    /// history sorted by timestamp matches delivery order.
    pub async fn forward_chat(&self, from: &ClientId, text: String) -> RelayOutcome {
        let mut record = None;
        let relayed = self
            .engine
            .relay_to_peer(from, |room_id, _| {
                let stored = StoredMessage::new(room_id, from.clone(), text);
                let message = ServerMessage::ChatMessage {
                    message: stored.message.clone(),
                    from: from.clone(),
                    timestamp: stored.timestamp,
                };
                record = Some(stored);
                message
            })
            .await;

        if let Some(record) = record {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                if let Err(e) = store.save_message(&record).await {
                    tracing::warn!(room_id = %record.room_id, error = %e, "failed to persist chat message");
                }
            });
        }

        outcome(from, "chat_message", relayed)
    }
}

fn outcome(
    from: &ClientId,
    kind: &'static str,
    relayed: Option<(RoomId, ClientId, Delivery)>,
) -> RelayOutcome {
    match relayed {
        None => {
            tracing::debug!(client_id = %from, kind, "sender not paired, relay dropped");
            RelayOutcome::Dropped
        }
        Some((room_id, peer_id, Delivery::Sent)) => {
            tracing::debug!(%room_id, %peer_id, kind, "relayed");
            RelayOutcome::Forwarded { room_id, peer_id }
        }
        Some((room_id, peer_id, Delivery::Absent | Delivery::Broken)) => {
            tracing::debug!(%room_id, %peer_id, kind, "peer gone, relay dropped");
            RelayOutcome::Dropped
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::MatchPolicy;
    use crate::persistence::memory::InMemoryStore;

    struct Fixture {
        relay: SignalingRelay,
        store: Arc<InMemoryStore>,
        a: mpsc::UnboundedReceiver<ServerMessage>,
        b: mpsc::UnboundedReceiver<ServerMessage>,
        c: mpsc::UnboundedReceiver<ServerMessage>,
        room_id: RoomId,
    }

    fn drain(inbox: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = inbox.try_recv() {
            out.push(msg);
        }
        out
    }

    async fn fixture() -> Fixture {
        let engine = Arc::new(MatchEngine::with_policy(MatchPolicy::Interests));
        let store = Arc::new(InMemoryStore::new());
        let mut inboxes = Vec::new();
        for id in ["a", "b", "c"] {
            let (tx, rx) = mpsc::unbounded_channel();
            let _ = engine.connect(ClientId::from(id), tx).await;
            inboxes.push(rx);
        }
        let _ = engine.ready(&ClientId::from("a"), Vec::new()).await;
        let _ = engine.ready(&ClientId::from("b"), Vec::new()).await;
        let Some((room_id, _)) = engine.peer_of(&ClientId::from("a")).await else {
            panic!("a and b should be paired");
        };

        let relay = SignalingRelay::new(engine, Arc::clone(&store) as Arc<dyn Store>);
        let (Some(c), Some(b), Some(a)) = (inboxes.pop(), inboxes.pop(), inboxes.pop()) else {
            panic!("three inboxes");
        };
        let mut fx = Fixture {
            relay,
            store,
            a,
            b,
            c,
            room_id,
        };
        drain(&mut fx.a);
        drain(&mut fx.b);
        fx
    }

    #[tokio::test]
    async fn offer_reaches_only_the_peer() {
        let mut fx = fixture().await;
        let outcome = fx
            .relay
            .forward_signal(&ClientId::from("a"), Signal::Offer(json!("X")))
            .await;
        assert_eq!(
            outcome,
            RelayOutcome::Forwarded {
                room_id: fx.room_id,
                peer_id: ClientId::from("b")
            }
        );
        assert_eq!(
            drain(&mut fx.b),
            vec![ServerMessage::Offer {
                sdp: json!("X"),
                from: ClientId::from("a")
            }]
        );
        assert!(drain(&mut fx.a).is_empty());
        assert!(drain(&mut fx.c).is_empty());
    }

    #[tokio::test]
    async fn ice_candidate_passes_through_unchanged() {
        let mut fx = fixture().await;
        let candidate = json!({"candidate": "candidate:1 1 udp 2122260223 10.0.0.1 54321 typ host", "sdpMLineIndex": 0});
        let _ = fx
            .relay
            .forward_signal(&ClientId::from("b"), Signal::IceCandidate(candidate.clone()))
            .await;
        assert_eq!(
            drain(&mut fx.a),
            vec![ServerMessage::IceCandidate {
                candidate,
                from: ClientId::from("b")
            }]
        );
    }

    #[tokio::test]
    async fn unpaired_sender_is_dropped() {
        let mut fx = fixture().await;
        let outcome = fx
            .relay
            .forward_signal(&ClientId::from("c"), Signal::Answer(json!("Y")))
            .await;
        assert_eq!(outcome, RelayOutcome::Dropped);
        assert!(drain(&mut fx.a).is_empty());
        assert!(drain(&mut fx.b).is_empty());
    }

    #[tokio::test]
    async fn chat_is_forwarded_and_persisted() {
        let mut fx = fixture().await;
        let outcome = fx
            .relay
            .forward_chat(&ClientId::from("a"), "hello".to_string())
            .await;
        assert!(matches!(outcome, RelayOutcome::Forwarded { .. }));

        let received = drain(&mut fx.b);
        let [ServerMessage::ChatMessage { message, from, .. }] = received.as_slice() else {
            panic!("expected one chat message, got {received:?}");
        };
        assert_eq!(message, "hello");
        assert_eq!(from, &ClientId::from("a"));

        let mut stored = Vec::new();
        for _ in 0..50 {
            stored = fx.store.list_messages(fx.room_id, 100).await.unwrap_or_default();
            if !stored.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.first().map(|m| m.message.as_str()), Some("hello"));
    }

    #[tokio::test]
    async fn chat_forwards_even_when_store_fails() {
        let mut fx = fixture().await;
        fx.store.fail_writes(true);
        let outcome = fx
            .relay
            .forward_chat(&ClientId::from("b"), "still here".to_string())
            .await;
        assert!(matches!(outcome, RelayOutcome::Forwarded { .. }));
        assert_eq!(drain(&mut fx.a).len(), 1);
    }

    #[tokio::test]
    async fn former_peer_never_receives_payload_after_repairing() {
        let mut fx = fixture().await;
        let engine = Arc::clone(&fx.relay.engine);
        let (a, b, c) = (ClientId::from("a"), ClientId::from("b"), ClientId::from("c"));

        let _ = engine.leave(&b).await;
        let _ = engine.ready(&c, Vec::new()).await;
        let _ = engine.ready(&b, Vec::new()).await;
        assert_eq!(engine.peer_of(&b).await.map(|(_, peer)| peer), Some(c.clone()));
        drain(&mut fx.b);

        let outcome = fx.relay.forward_signal(&a, Signal::Offer(json!("stale"))).await;
        assert_eq!(outcome, RelayOutcome::Dropped);
        assert!(drain(&mut fx.b).is_empty());
        assert!(drain(&mut fx.c).iter().all(|m| m.kind() != "offer"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn relayed_offers_only_reach_the_current_peer() {
        let mut fx = fixture().await;
        let engine = Arc::clone(&fx.relay.engine);

        let relay = fx.relay.clone();
        let sender = tokio::spawn(async move {
            let a = ClientId::from("a");
            for i in 0..400 {
                let _ = relay.forward_signal(&a, Signal::Offer(json!(i))).await;
                tokio::task::yield_now().await;
            }
        });
        let churn = tokio::spawn(async move {
            let (a, b, c) = (ClientId::from("a"), ClientId::from("b"), ClientId::from("c"));
            for _ in 0..100 {
                let _ = engine.leave(&b).await;
                let _ = engine.ready(&c, Vec::new()).await;
                let _ = engine.ready(&b, Vec::new()).await;
                let _ = engine.leave(&b).await;
                let _ = engine.ready(&a, Vec::new()).await;
                let _ = engine.ready(&b, Vec::new()).await;
                tokio::task::yield_now().await;
            }
        });
        let _ = sender.await;
        let _ = churn.await;

        // b's inbox is written in lock order, so every offer must arrive
        // while b is paired with its sender.
        let mut current_peer: Option<ClientId> = None;
        for message in drain(&mut fx.b) {
            match message {
                ServerMessage::Paired { peer_id, .. } => current_peer = Some(peer_id),
                ServerMessage::PeerDisconnected | ServerMessage::Disconnected => current_peer = None,
                ServerMessage::Offer { from, .. } => {
                    assert_eq!(current_peer.as_ref(), Some(&from), "offer from a non-peer");
                }
                _ => {}
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn chat_history_keeps_send_order() {
        let mut fx = fixture().await;
        let a = ClientId::from("a");
        for i in 0..200 {
            let _ = fx.relay.forward_chat(&a, i.to_string()).await;
        }
        assert_eq!(drain(&mut fx.b).len(), 200);

        let mut stored = Vec::new();
        for _ in 0..100 {
            stored = fx.store.list_messages(fx.room_id, 1000).await.unwrap_or_default();
            if stored.len() == 200 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let bodies: Vec<String> = stored.into_iter().map(|m| m.message).collect();
        let expected: Vec<String> = (0..200).map(|i: i32| i.to_string()).collect();
        assert_eq!(bodies, expected);
    }
}
