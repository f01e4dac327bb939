//! WebRTC signaling WebSocket endpoint (`/webrtc`).
//!
//! Unlike the chat endpoint, membership starts with an explicit `join` frame
//! rather than a query parameter, so the handler keeps the per-connection
//! join state and runs a single select loop instead of a task pair.

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ClientId, PusherChannel, RoomId};
use crate::infrastructure::dto::websocket::{ClientFrame, ServerFrame, SignalForward};

use super::super::state::AppState;

/// Per-connection signaling state once a `join` frame has been accepted
struct Membership {
    room_id: RoomId,
    client_id: ClientId,
    user: String,
}

pub async fn signaling_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_signaling_socket(socket, state))
}

async fn handle_signaling_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut membership: Option<Membership> = None;

    tracing::info!("New signaling connection");

    loop {
        tokio::select! {
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let flow = handle_signal_frame(&state, &tx, &mut membership, &text).await;
                        if flow.is_break() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
            outbound = rx.recv() => {
                match outbound {
                    Some(msg) => {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    if let Some(membership) = membership.take() {
        leave_room(&state, membership).await;
    }
    tracing::info!("Signaling connection closed");
}

async fn handle_signal_frame(
    state: &Arc<AppState>,
    tx: &PusherChannel,
    membership: &mut Option<Membership>,
    raw: &str,
) -> ControlFlow<()> {
    let frame = match serde_json::from_str::<ClientFrame>(raw) {
        Ok(frame) => frame,
        Err(e) => {
            // Silent-drop policy: nothing goes back over the wire.
            tracing::warn!("WebSocket message error: {}", e);
            return ControlFlow::Continue(());
        }
    };

    match frame {
        ClientFrame::Join(join) => {
            if membership.is_some() {
                tracing::debug!("Ignoring join from an already-joined connection");
                return ControlFlow::Continue(());
            }
            match state
                .signaling_usecase
                .join(join.room, join.user.clone(), tx.clone())
                .await
            {
                Ok((room_id, client_id)) => {
                    let notice = ServerFrame::UserJoined {
                        user: join.user.clone(),
                    };
                    state
                        .dispatcher
                        .broadcast(&room_id, &notice.encode(), Some(&client_id))
                        .await;
                    *membership = Some(Membership {
                        room_id,
                        client_id,
                        user: join.user,
                    });
                }
                Err(e) => tracing::warn!("Rejected signaling join: {}", e),
            }
        }
        ClientFrame::Offer(body) => {
            relay(state, membership.as_ref(), |user| {
                ServerFrame::Offer(SignalForward::new(user, body))
            })
            .await;
        }
        ClientFrame::Answer(body) => {
            relay(state, membership.as_ref(), |user| {
                ServerFrame::Answer(SignalForward::new(user, body))
            })
            .await;
        }
        ClientFrame::IceCandidate(body) => {
            relay(state, membership.as_ref(), |user| {
                ServerFrame::IceCandidate(SignalForward::new(user, body))
            })
            .await;
        }
        ClientFrame::Message(relay_body) => {
            if let Some(member) = membership.as_ref() {
                let frame = ServerFrame::Message {
                    user: member.user.clone(),
                    data: relay_body.data,
                };
                state
                    .dispatcher
                    .broadcast(&member.room_id, &frame.encode(), Some(&member.client_id))
                    .await;
            }
        }
        ClientFrame::Leave => {
            // Explicit leave keeps the socket open for a later re-join.
            if let Some(membership) = membership.take() {
                leave_room(state, membership).await;
            }
        }
        ClientFrame::Unknown => tracing::info!("Unknown message type"),
        other => tracing::debug!("Ignoring frame on signaling endpoint: {:?}", other),
    }

    ControlFlow::Continue(())
}

/// Forward a point-to-point envelope to its named target. A connection that
/// has not joined, or a target absent from the room, drops the envelope
/// silently.
async fn relay(
    state: &Arc<AppState>,
    membership: Option<&Membership>,
    build: impl FnOnce(&str) -> ServerFrame,
) {
    let Some(member) = membership else {
        tracing::debug!("Dropping signaling frame from an unjoined connection");
        return;
    };
    let frame = build(&member.user);
    let target = match &frame {
        ServerFrame::Offer(f) | ServerFrame::Answer(f) | ServerFrame::IceCandidate(f) => {
            f.target.clone()
        }
        _ => return,
    };
    state
        .signaling_usecase
        .relay(&member.room_id, &target, &frame.encode())
        .await;
}

async fn leave_room(state: &Arc<AppState>, membership: Membership) {
    if let Some(departure) = state
        .disconnect_usecase
        .execute(&membership.room_id, &membership.client_id)
        .await
    {
        if departure.remaining > 0 {
            let notice = ServerFrame::Leave {
                user: departure.display_name,
            };
            state
                .dispatcher
                .broadcast(&membership.room_id, &notice.encode(), None)
                .await;
        }
    }
}
