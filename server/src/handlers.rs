//! Thin JSON-body wrappers around the phase-controller boundary
//! operations. The creator-only checks on `start_game`/`stop_game` are
//! enforced by the controller against `Game::creator`; authentication
//! beyond that is out of scope, since the `requester`/`user` each request
//! claims is taken at face value via a request field, not a session — a
//! TODO seam for a real `AuthContext`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use diplomacy_protocol::{Game, GameId, GameStatus, Order, PhaseId, PowerAssignmentMode, Power, Seat};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub name: String,
    pub creator: String,
    #[serde(default)]
    pub power_assignment_mode: Option<PowerAssignmentMode>,
}

#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    pub game: GameId,
}

pub async fn create_game(State(state): State<Arc<AppState>>, Json(body): Json<CreateGameRequest>) -> Result<Json<CreateGameResponse>, ApiError> {
    let game = Game {
        id: GameId::new(),
        name: body.name,
        creator: body.creator,
        status: GameStatus::Waiting,
        winner: None,
        turn_duration: state.config.turn_duration,
        retreat_duration: state.config.retreat_duration,
        build_duration: state.config.build_duration,
        power_assignment_mode: body.power_assignment_mode.unwrap_or(PowerAssignmentMode::Random),
        max_year: state.config.max_year,
    };
    let id = game.id;
    state.controller.create_game(game).await?;
    Ok(Json(CreateGameResponse { game: id }))
}

#[derive(Debug, Deserialize)]
pub struct SeatRequest {
    pub user: String,
    pub power: Option<Power>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub bot_difficulty: Option<String>,
}

pub async fn seat_player(State(state): State<Arc<AppState>>, Path(game): Path<GameId>, Json(body): Json<SeatRequest>) -> Result<(), ApiError> {
    state
        .controller
        .seat_player(Seat { game, user: body.user, power: body.power, is_bot: body.is_bot, bot_difficulty: body.bot_difficulty })
        .await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RequesterRequest {
    pub requester: String,
}

pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(game): Path<GameId>,
    Json(body): Json<RequesterRequest>,
) -> Result<(), ApiError> {
    state.controller.start_game(game, body.requester).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct OrdersRequest {
    pub phase: PhaseId,
    pub power: Power,
    pub orders: Vec<Order>,
}

pub async fn submit_orders(State(state): State<Arc<AppState>>, Path(game): Path<GameId>, Json(body): Json<OrdersRequest>) -> Result<(), ApiError> {
    state.controller.submit_orders(game, body.phase, body.power, body.orders).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct PhasePowerRequest {
    pub phase: PhaseId,
    pub power: Power,
}

pub async fn mark_ready(State(state): State<Arc<AppState>>, Path(game): Path<GameId>, Json(body): Json<PhasePowerRequest>) -> Result<(), ApiError> {
    state.controller.mark_ready(game, body.phase, body.power).await?;
    Ok(())
}

pub async fn unmark_ready(State(state): State<Arc<AppState>>, Path(game): Path<GameId>, Json(body): Json<PhasePowerRequest>) -> Result<(), ApiError> {
    state.controller.unmark_ready(game, body.phase, body.power).await?;
    Ok(())
}

pub async fn vote_draw(State(state): State<Arc<AppState>>, Path(game): Path<GameId>, Json(body): Json<PhasePowerRequest>) -> Result<(), ApiError> {
    state.controller.vote_draw(game, body.phase, body.power).await?;
    Ok(())
}

pub async fn unvote_draw(State(state): State<Arc<AppState>>, Path(game): Path<GameId>, Json(body): Json<PhasePowerRequest>) -> Result<(), ApiError> {
    state.controller.unvote_draw(game, body.phase, body.power).await?;
    Ok(())
}

pub async fn stop_game(
    State(state): State<Arc<AppState>>,
    Path(game): Path<GameId>,
    Json(body): Json<RequesterRequest>,
) -> Result<(), ApiError> {
    state.controller.stop_game(game, body.requester).await?;
    Ok(())
}

pub async fn get_game(State(state): State<Arc<AppState>>, Path(game): Path<GameId>) -> Result<Json<Game>, ApiError> {
    Ok(Json(state.log.get_game(game).await?))
}
