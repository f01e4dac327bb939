//! Chat WebSocket endpoint (`/ws`).
//!
//! Each connection gets a receive loop and a send task draining an unbounded
//! channel into the socket, so there is exactly one writer per connection and
//! frame order is preserved end to end.

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use idobata_shared::time::now_millis;

use crate::domain::{ClientId, RoomId};
use crate::infrastructure::dto::websocket::{ClientFrame, ServerFrame};

use super::super::state::{AppState, ConnectQuery};

pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state, query.session_id))
}

async fn handle_chat_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    requested_session: Option<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let outcome = match state
        .join_session_usecase
        .execute(requested_session, tx.clone())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Failed to join session: {}", e);
            return;
        }
    };
    let session_id = outcome.session_id.clone();
    let client_id = outcome.client_id.clone();

    // Ack, then the one-time backlog, then the presence notice. All three ride
    // the client's own channel, so the joiner sees the history before any live
    // broadcast.
    let ack = ServerFrame::Session {
        session_id: session_id.as_str().to_string(),
        client_id: client_id.as_str().to_string(),
    };
    if tx.send(ack.encode()).is_err() {
        finish_chat(&state, &session_id, &client_id).await;
        return;
    }
    if !outcome.history.is_empty() {
        let _ = tx.send(ServerFrame::history(outcome.history).encode());
    }
    let joined = ServerFrame::System {
        message: "A new user joined the chat".to_string(),
        timestamp: now_millis(),
    };
    state
        .dispatcher
        .broadcast(&session_id, &joined.encode(), None)
        .await;

    let recv_state = state.clone();
    let recv_session = session_id.clone();
    let recv_client = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    // Transport errors take the same cleanup path as a close.
                    tracing::warn!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let flow =
                        handle_chat_frame(&recv_state, &recv_session, &recv_client, &text).await;
                    if flow.is_break() {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_client.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If either task completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    finish_chat(&state, &session_id, &client_id).await;
}

/// Dispatch one inbound frame. Malformed JSON and unknown types are logged
/// and dropped; a single bad frame never severs the connection, and no error
/// is surfaced to the sender.
async fn handle_chat_frame(
    state: &Arc<AppState>,
    session_id: &RoomId,
    client_id: &ClientId,
    raw: &str,
) -> ControlFlow<()> {
    let frame = match serde_json::from_str::<ClientFrame>(raw) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Error processing message: {}", e);
            return ControlFlow::Continue(());
        }
    };

    match frame {
        ClientFrame::Chat(chat) => {
            match state
                .send_message_usecase
                .execute(session_id, client_id, chat.text)
                .await
            {
                Ok(posted) => {
                    // Sender included: clients do not locally echo. Delivery
                    // goes to the append-time recipient snapshot, so a member
                    // joining mid-send replays from history instead.
                    let payload = ServerFrame::chat(posted.message).encode();
                    state
                        .dispatcher
                        .deliver(session_id, posted.recipients, &payload)
                        .await;
                }
                Err(e) => tracing::debug!("Dropping chat frame: {}", e),
            }
        }
        ClientFrame::UpdateUser(update) => {
            if let Some(rename) = state
                .update_profile_usecase
                .execute(session_id, client_id, update.name, update.avatar)
                .await
            {
                let notice = ServerFrame::System {
                    message: rename.notice(),
                    timestamp: now_millis(),
                };
                state
                    .dispatcher
                    .broadcast(session_id, &notice.encode(), None)
                    .await;
            }
        }
        ClientFrame::Leave => return ControlFlow::Break(()),
        ClientFrame::Unknown => tracing::info!("Unknown message type"),
        other => tracing::debug!("Ignoring frame on chat endpoint: {:?}", other),
    }

    ControlFlow::Continue(())
}

/// Close-path cleanup: remove the member (idempotent), announce the departure
/// if anyone is left, and let the registry drop the room at zero members.
async fn finish_chat(state: &Arc<AppState>, session_id: &RoomId, client_id: &ClientId) {
    if let Some(departure) = state.disconnect_usecase.execute(session_id, client_id).await {
        if departure.remaining > 0 {
            let notice = ServerFrame::System {
                message: departure.notice(),
                timestamp: now_millis(),
            };
            state
                .dispatcher
                .broadcast(session_id, &notice.encode(), None)
                .await;
        }
    }
}
