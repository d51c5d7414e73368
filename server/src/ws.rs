//! `GET /ws?game=<id>`: upgrades to a WebSocket and relays every event the
//! hub (C4) publishes for that game, as JSON, until the connection drops.
//! Splits the upgrade from the relay task the same way as most axum
//! websocket handlers: `on_upgrade` hands off to a dedicated async fn.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use diplomacy_protocol::GameId;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    game: GameId,
}

pub async fn websocket_handler(ws: WebSocketUpgrade, Query(query): Query<WsQuery>, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay(socket, query.game, state))
}

async fn relay(socket: WebSocket, game: GameId, state: Arc<AppState>) {
    let mut receiver = state.hub.subscribe(game).await;
    let (mut sender, _incoming) = socket.split();

    loop {
        match receiver.recv().await {
            Ok(event) => {
                let payload = match serde_json::to_string(&event) {
                    Ok(p) => p,
                    Err(err) => {
                        warn!(%err, "failed to serialize event for websocket relay");
                        continue;
                    }
                };
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    debug!(%game, "websocket relay client disconnected");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(%game, skipped, "websocket relay fell behind, client should refetch authoritative state");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
