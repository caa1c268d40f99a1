//! Participant endpoints.
//!
//! - POST /participants - join the room under a unique name
//! - GET  /participants - list everyone currently present

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use plaza_types::participant::Participant;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for joining the room.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

/// POST /participants - register a presence.
pub async fn join(
    State(state): State<AppState>,
    Json(body): Json<JoinRequest>,
) -> Result<(StatusCode, Json<Participant>), AppError> {
    let participant = state.presence.join(&body.name).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// GET /participants - list participants in store order.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, AppError> {
    let participants = state.presence.list().await?;
    Ok(Json(participants))
}
