//! Heartbeat endpoint.
//!
//! POST /status - refresh the requester's presence so the sweeper keeps
//! them in the room. Clients call this on an interval shorter than the
//! server's staleness threshold.

use axum::extract::State;
use axum::http::StatusCode;

use crate::http::error::AppError;
use crate::http::extractors::user::UserHeader;
use crate::state::AppState;

/// POST /status - record a heartbeat for the `user` header's participant.
pub async fn heartbeat(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
) -> Result<StatusCode, AppError> {
    state.presence.heartbeat(&user).await?;
    Ok(StatusCode::OK)
}
