use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::session::{Session, SessionManager};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// WebSocket endpoint for a judge: `/ws/juez/{judge_id}?token=...`.
///
/// Credentials are checked before the upgrade itself; a refused handshake
/// gets a bare 403 with no body. The session joins its group at that point
/// and leaves it again if the upgrade never completes.
pub async fn judge_socket(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
    Path(judge_id): Path<String>,
    Query(params): Query<ConnectParams>,
) -> Response {
    match state
        .sessions
        .connect(params.token.as_deref(), &judge_id)
        .await
    {
        Ok(session) => match ws {
            Ok(ws) => {
                let (group, session_id) = (session.group.clone(), session.id);
                let dispatcher = state.dispatcher.clone();
                let manager = state.sessions.clone();
                ws.on_failed_upgrade(move |e| {
                    debug!(session_id = %session_id, "WebSocket upgrade failed: {}", e);
                    dispatcher.leave(&group, session_id);
                })
                .on_upgrade(move |socket| serve(manager, session, socket))
            }
            Err(rejection) => {
                state.sessions.disconnect(&session);
                rejection.into_response()
            }
        },
        Err(e) => {
            warn!(claimed_judge_id = %judge_id, "WebSocket handshake refused: {}", e);
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// Drive one session: replies are sent in the order requests arrive and
/// group events are forwarded between requests.
async fn serve(manager: Arc<SessionManager>, mut session: Session, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            incoming = stream.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                        Ok(text) => text,
                        Err(_) => {
                            debug!(session_id = %session.id, "Ignoring non UTF-8 binary frame");
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!(session_id = %session.id, "WebSocket receive error: {}", e);
                        break;
                    }
                };

                let reply = manager.handle_message(&session, &text).await;
                if send_json(&mut sink, &reply).await.is_err() {
                    break;
                }
            }
            event = session.next_event() => {
                let Some(event) = event else { break };
                if send_json(&mut sink, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    manager.disconnect(&session);
}

async fn send_json<T: Serialize>(
    sink: &mut SplitSink<WebSocket, Message>,
    payload: &T,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(payload).map_err(axum::Error::new)?;
    sink.send(Message::Text(text)).await.map_err(|e| {
        warn!("Failed to send WebSocket message: {}", e);
        e
    })
}
