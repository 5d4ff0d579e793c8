//! Realtime notification hub.
//!
//! Fan-out over a `tokio::sync::broadcast` channel. Delivery is best effort
//! and at most once: nothing is persisted and lagging clients skip what they
//! missed.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError, Receiver, Sender};
use tracing::{debug, info};

use crate::AppState;

/// Event pushed to connected clients.
pub const RECEIVE_EVENT: &str = "receiveNotification";

/// Event clients send to broadcast to everyone else.
pub const SEND_EVENT: &str = "sendNotification";

const CHANNEL_CAPACITY: usize = 256;

/// One notification frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub event: String,
    pub data: Value,
    /// Client id this frame is meant for; `None` reaches everyone.
    #[serde(skip)]
    pub target: Option<String>,
}

impl Notification {
    pub fn is_for(&self, client_id: &str) -> bool {
        self.target.as_deref().map_or(true, |t| t == client_id)
    }
}

/// Shared broadcaster, cheap to clone.
#[derive(Clone)]
pub struct NotificationHub {
    sender: Sender<Notification>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish a notification; returns how many receivers got it.
    ///
    /// Having no listeners is not an error.
    pub fn broadcast(&self, event: &str, data: Value, target: Option<String>) -> usize {
        let delivered = self
            .sender
            .send(Notification {
                event: event.to_string(),
                data,
                target,
            })
            .unwrap_or(0);

        debug!(event = event, delivered = delivered, "Notification broadcast");
        delivered
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn connected(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Handle a text frame sent by a client.
    ///
    /// `sendNotification` frames are rebroadcast as `receiveNotification`;
    /// anything else is ignored.
    pub fn handle_client_frame(&self, text: &str) -> Option<usize> {
        let frame: ClientFrame = serde_json::from_str(text).ok()?;
        if frame.event != SEND_EVENT {
            return None;
        }
        Some(self.broadcast(RECEIVE_EVENT, frame.data, None))
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
pub struct WsParams {
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> Response {
    let client_id = params
        .client_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    ws.on_upgrade(move |socket| handle_socket(socket, state.notifier, client_id))
}

async fn handle_socket(socket: WebSocket, hub: NotificationHub, client_id: String) {
    let mut rx = hub.subscribe();

    info!(client_id = %client_id, "Notification client connected");

    let (mut sender, mut receiver) = socket.split();

    let forward_id = client_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let notification = match rx.recv().await {
                Ok(n) => n,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(client_id = %forward_id, skipped = skipped, "Client lagging");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if !notification.is_for(&forward_id) {
                continue;
            }

            let Ok(text) = serde_json::to_string(&notification) else {
                continue;
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let inbound = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    inbound.handle_client_frame(&text);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!(client_id = %client_id, "Notification client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_broadcast_without_listeners() {
        let hub = NotificationHub::new();
        assert_eq!(hub.broadcast(RECEIVE_EVENT, json!({"message": "hi"}), None), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_broadcast() {
        let hub = NotificationHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_eq!(hub.connected(), 2);

        let delivered = hub.broadcast(RECEIVE_EVENT, json!({"message": "new post"}), None);
        assert_eq!(delivered, 2);

        let got = a.recv().await.unwrap();
        assert_eq!(got.event, RECEIVE_EVENT);
        assert_eq!(got.data["message"], "new post");
        assert_eq!(b.recv().await.unwrap(), got);
    }

    #[test]
    fn test_targeting() {
        let targeted = Notification {
            event: RECEIVE_EVENT.into(),
            data: Value::Null,
            target: Some("u1".into()),
        };
        assert!(targeted.is_for("u1"));
        assert!(!targeted.is_for("u2"));

        let open = Notification {
            target: None,
            ..targeted
        };
        assert!(open.is_for("anyone"));
    }

    #[test]
    fn test_frame_shape_hides_target() {
        let n = Notification {
            event: RECEIVE_EVENT.into(),
            data: json!({"message": "x"}),
            target: Some("u1".into()),
        };
        assert_eq!(
            serde_json::to_value(&n).unwrap(),
            json!({"event": "receiveNotification", "data": {"message": "x"}})
        );
    }

    #[tokio::test]
    async fn test_client_frames() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe();

        let sent = hub.handle_client_frame(r#"{"event":"sendNotification","data":{"message":"hello"}}"#);
        assert_eq!(sent, Some(1));
        let got = rx.recv().await.unwrap();
        assert_eq!(got.event, RECEIVE_EVENT);
        assert_eq!(got.data, json!({"message": "hello"}));

        assert_eq!(hub.handle_client_frame(r#"{"event":"typing"}"#), None);
        assert_eq!(hub.handle_client_frame("not json"), None);
    }

    #[tokio::test]
    async fn test_lagging_receiver_skips_ahead() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe();
        for i in 0..(CHANNEL_CAPACITY + 5) {
            hub.broadcast(RECEIVE_EVENT, json!(i), None);
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(5))));
        assert_eq!(rx.recv().await.unwrap().data, json!(5));
    }
}
