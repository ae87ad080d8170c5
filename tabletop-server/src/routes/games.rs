//! Lobby and room membership endpoints

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tabletop_core::{AvailableGame, GameType, StateSnapshot};

#[derive(Serialize)]
pub struct GamesResponse {
    pub games: Vec<AvailableGame>,
}

/// Rooms still accepting players
pub async fn list_games(State(state): State<Arc<ServerState>>) -> Json<GamesResponse> {
    Json(GamesResponse {
        games: state.manager.get_available_games(),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub player_id: String,
    pub player_name: String,
    pub game_type: GameType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub game_id: String,
    pub game_type: GameType,
    pub game_state: StateSnapshot,
}

pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<CreateResponse>, ApiError> {
    let created = state
        .manager
        .create_game(&req.player_id, &req.player_name, req.game_type)?;
    let game_state = state.manager.get_game_state(&created.game_id)?;

    Ok(Json(CreateResponse {
        game_id: created.game_id,
        game_type: created.game_type,
        game_state,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub game_state: StateSnapshot,
}

pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<StateResponse>, ApiError> {
    let game_state = state.manager.get_game_state(&id)?;
    Ok(Json(StateResponse { game_state }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub player_id: String,
    pub player_name: String,
}

/// Join a room; everyone in it hears about the new player
pub async fn join_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let game_state = state.manager.join_game(&id, &req.player_id, &req.player_name)?;
    Ok(Json(StateResponse { game_state }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub player_id: String,
}

/// Leave a room; always succeeds
pub async fn leave_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<LeaveRequest>,
) -> Json<Value> {
    state.manager.remove_player(&id, &req.player_id);
    Json(json!({ "ok": true }))
}
