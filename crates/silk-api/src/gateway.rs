//! WebSocket broadcast gateway.
//!
//! One task pair per viewer: an outbound forwarder draining the
//! session's bounded queue into the socket, and the inbound loop below
//! acking every message and feeding recognized control messages into
//! the room pipeline. Either side failing tears the session down
//! through the registry; other viewers never notice.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::messages::{ClientMessage, ServerMessage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Room to join; the configured default when omitted
    pub room: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let room = query
        .room
        .unwrap_or_else(|| state.config().room.default_room.clone());
    ws.on_upgrade(move |socket| serve_viewer(socket, state, room))
}

async fn serve_viewer(socket: WebSocket, state: AppState, room_name: String) {
    let room = state.room(&room_name).await;
    let registry = state.registry();

    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.config().stream.queue_capacity);
    let session_id = registry.register(tx.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Outbound forwarder: drains the session queue until every sender
    // clone is gone or the transport dies.
    let mut forwarder = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode outbound message");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Handshake: become visible to broadcasts, then sync the current
    // state. The snapshot runs through the room queue, so it reflects
    // every update already applied.
    registry.activate(session_id).await;
    match room.snapshot().await {
        Ok(snapshot) => {
            let _ = tx.send(ServerMessage::InitSync(snapshot)).await;
        }
        Err(e) => {
            tracing::error!(session = %session_id, error = %e, "init snapshot failed");
            registry.remove(session_id).await;
            return;
        }
    }
    tracing::info!(session = %session_id, room = %room_name, "viewer connected");

    while let Some(inbound) = stream.next().await {
        match inbound {
            Ok(Message::Text(text)) => {
                // Every inbound message is acknowledged, recognized or not.
                if tx.send(ServerMessage::ack()).await.is_err() {
                    break;
                }

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Frame(frame)) => {
                        if let Err(e) = room.submit_frame(frame).await {
                            tracing::error!(session = %session_id, error = %e, "room unavailable");
                            break;
                        }
                    }
                    Ok(ClientMessage::Particle(update)) => {
                        if room.update_particle(update).await.is_err() {
                            break;
                        }
                    }
                    Ok(ClientMessage::Color(request)) => {
                        if room.change_color(request).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        tracing::debug!(session = %session_id, "opaque control message");
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(session = %session_id, error = %e, "viewer transport error");
                break;
            }
        }
    }

    // Tear down: leave the broadcast set, then let in-flight sends
    // drain within the grace period.
    registry.remove(session_id).await;
    drop(tx);
    if tokio::time::timeout(state.config().stream.close_grace(), &mut forwarder)
        .await
        .is_err()
    {
        tracing::debug!(session = %session_id, "forwarder exceeded close grace");
        forwarder.abort();
    }
    tracing::info!(session = %session_id, "viewer disconnected");
}
