//! WebSocket upgrade handler for the live notification channel.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use repairdesk_core::error::AppError;
use repairdesk_realtime::connection::OutboundFrame;
use repairdesk_realtime::connection::heartbeat;
use repairdesk_service::context::RequestContext;

use crate::extractors::auth::authenticate;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token. Browsers cannot set headers on an upgrade.
    pub access_token: Option<String>,
}

/// GET /ws?access_token={jwt}
///
/// The token is checked before the upgrade so an unauthenticated client
/// gets a 401 instead of an open socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let token = match query.access_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return AppError::unauthorized("Missing access_token").into_response(),
    };

    let ctx = match authenticate(&state, token).await {
        Ok(ctx) => ctx,
        Err(e) => return e.into_response(),
    };

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_ws_connection(state, ctx, socket)),
        Err(rejection) => rejection.into_response(),
    }
}

/// Drives one established connection until either side closes it.
async fn handle_ws_connection(state: AppState, ctx: RequestContext, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let connections = Arc::clone(&state.realtime.connections);

    let (handle, mut outbound_rx) = connections.register(ctx.user_id, ctx.username.clone());
    let conn_id = handle.id;

    let mut keepalive = tokio::spawn(heartbeat::run_keepalive(
        Arc::clone(&handle),
        state.realtime.ping_interval(),
    ));
    let mut stop_rx = state.realtime.stop_signal();

    info!(conn_id = %conn_id, username = %ctx.username, "WebSocket connection established");

    loop {
        tokio::select! {
            frame = outbound_rx.recv() => {
                let Some(frame) = frame else { break };
                let message = match frame {
                    OutboundFrame::Text(text) => Message::Text(text.into()),
                    OutboundFrame::Ping => Message::Ping(Bytes::new()),
                };
                if let Err(e) = ws_tx.send(message).await {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket send failed");
                    break;
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        connections.handle_inbound(&conn_id, text.as_str());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }
            // Keepalive only stops once the handle is closed, e.g. when a
            // newer connection of the same user replaced this one.
            _ = &mut keepalive => {
                debug!(conn_id = %conn_id, "Connection closed by server");
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }
            _ = async { let _ = stop_rx.wait_for(|stopping| *stopping).await; } => {
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }
        }
    }

    keepalive.abort();
    connections.unregister(&conn_id);

    info!(conn_id = %conn_id, username = %ctx.username, "WebSocket connection closed");
}
