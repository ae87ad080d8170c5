//! In-game actions: checkers moves, dice rolls, Ludo moves
//!
//! Room events for these are published by the registry's observer.

use crate::error::ApiError;
use crate::routes::games::StateResponse;
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tabletop_core::{CheckersMove, DiceRoll};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub player_id: String,
    #[serde(rename = "move")]
    pub mv: CheckersMove,
}

pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let game_state = state.manager.make_move(&id, &req.player_id, req.mv)?;
    Ok(Json(StateResponse { game_state }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    pub player_id: String,
}

/// Roll for the current player; the reply carries the post-roll state
pub async fn roll_dice(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<RollRequest>,
) -> Result<Json<DiceRoll>, ApiError> {
    let roll = state.manager.roll_dice(&id, &req.player_id)?;
    Ok(Json(roll))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LudoMoveRequest {
    pub player_id: String,
    pub piece_id: String,
}

pub async fn move_ludo_piece(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<LudoMoveRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let game_state = state
        .manager
        .move_ludo_piece(&id, &req.player_id, &req.piece_id)?;
    Ok(Json(StateResponse { game_state }))
}
