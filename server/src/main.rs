mod config;
mod error;
mod handlers;
mod state;
mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
/// Sets up tracing, recovers any active games from the durable log, spawns
/// the controller's trigger-draining task, and serves the HTTP/WebSocket
/// surface until the process is killed.
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr.clone();
    let (app_state, expiry_rx) = AppState::new(config);

    if let Err(err) = diplomacy_core::recovery::recover_and_sweep(&app_state.controller, &app_state.log, &app_state.cache, &app_state.timer).await {
        tracing::error!(?err, "startup recovery failed");
    }

    let controller = app_state.controller.clone();
    tokio::spawn(async move {
        controller.run(expiry_rx).await;
    });

    let app = Router::new()
        .route("/games", post(handlers::create_game))
        .route("/games/{id}", get(handlers::get_game))
        .route("/games/{id}/seats", post(handlers::seat_player))
        .route("/games/{id}/start", post(handlers::start_game))
        .route("/games/{id}/stop", post(handlers::stop_game))
        .route("/games/{id}/orders", post(handlers::submit_orders))
        .route("/games/{id}/ready", post(handlers::mark_ready).delete(handlers::unmark_ready))
        .route("/games/{id}/draw-vote", post(handlers::vote_draw).delete(handlers::unvote_draw))
        .route("/ws", get(ws::websocket_handler))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!(%bind_addr, "listening");
    axum::serve(listener, app).await.unwrap();
}
