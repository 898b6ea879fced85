//! WebSocket subscriber transport
//!
//! Push-only: frames from the subscriber queue go out as text messages;
//! anything the client sends is read and discarded.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};

use crate::hub::{BroadcastHub, Subscription};

/// Upgrade handler for `/ws`
///
/// The subscriber is registered before the upgrade completes so no event
/// committed after this request is missed.
pub async fn subscribe(ws: WebSocketUpgrade, State(hub): State<Arc<BroadcastHub>>) -> Response {
    match hub.subscribe() {
        Some(subscription) => ws.on_upgrade(move |socket| serve(socket, hub, subscription)),
        None => (StatusCode::SERVICE_UNAVAILABLE, "subscriber limit reached").into_response(),
    }
}

async fn serve(socket: WebSocket, hub: Arc<BroadcastHub>, mut subscription: Subscription) {
    let id = subscription.id();
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = subscription.recv() => {
                // None: the registry dropped us
                let Some(frame) = frame else { break };

                let text = match std::str::from_utf8(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(subscriber = id, error = %e, "Frame is not UTF-8");
                        continue;
                    }
                };

                if let Err(e) = sender.send(Message::Text(text.into())).await {
                    tracing::debug!(subscriber = id, error = %e, "Send failed");
                    break;
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(subscriber = id, error = %e, "Receive failed");
                        break;
                    }
                    // Not part of the protocol
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.subscribers().remove(id);
    tracing::debug!(subscriber = id, "WebSocket closed");
}
