//! Real-time signal feed over WebSocket using STOMP frames.
//!
//! - `hub` - Broadcast channel fed by `SignalService`
//! - `stomp` - Frame codec
//! - `session` - Per-connection protocol state

pub mod hub;
pub mod session;
pub mod stomp;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::server::{
    state::AppState,
    ws::{
        session::{Reply, StompSession},
        stomp::Frame,
    },
};

/// Upgrades `GET /ws` to a STOMP-over-WebSocket session.
///
/// Authentication happens in the STOMP `CONNECT` frame, not on the upgrade request, so
/// browser clients that can not set headers on the handshake still work.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.protocols(["v12.stomp"])
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.signal_hub.subscribe();
    let mut session = StompSession::new(&state.db, &state.jwt);

    loop {
        let reply = tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => match Frame::parse_all(text.as_str()) {
                    Ok(frames) => {
                        let mut reply = Reply::default();
                        for frame in frames {
                            let step = session.handle(frame).await;
                            reply.frames.extend(step.frames);
                            if step.close {
                                reply.close = true;
                                break;
                            }
                        }
                        reply
                    }
                    Err(e) => Reply {
                        frames: vec![Frame::error("Malformed frame", &e.to_string())],
                        close: true,
                    },
                },
                Some(Ok(Message::Binary(_))) => Reply {
                    frames: vec![Frame::error(
                        "Unsupported message",
                        "Frames must be sent as text messages",
                    )],
                    close: true,
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::debug!("WebSocket receive error: {}", e);
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => session.messages_for(&event, Utc::now()).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "STOMP session lagged behind the signal hub");
                    continue;
                }
                Err(RecvError::Closed) => break,
            },
        };

        for frame in reply.frames {
            if let Err(e) = sender.send(Message::Text(frame.serialize().into())).await {
                tracing::debug!("WebSocket send error: {}", e);
                return;
            }
        }

        if reply.close {
            let _ = sender.send(Message::Close(None)).await;
            break;
        }
    }

    if let Some(user) = session.user() {
        tracing::debug!(user_id = user.id, "STOMP session closed");
    }
}
