//! Message endpoints.
//!
//! - POST   /messages     - send a broadcast or private message
//! - GET    /messages     - poll messages visible to the requester
//! - PUT    /messages/:id - edit an owned message
//! - DELETE /messages/:id - delete an owned message

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use plaza_types::message::{Message, MessageDraft, MessageKind, MessagePatch};

use crate::http::error::AppError;
use crate::http::extractors::user::UserHeader;
use crate::state::AppState;

/// Request body for sending or editing a message.
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub to: String,
    pub text: String,
    pub kind: String,
}

/// Query parameters for message listing.
#[derive(Debug, Deserialize, Default)]
pub struct MessageListQuery {
    /// Most-recent cap on the visible set. Kept as a string so a malformed
    /// value maps to 422 rather than axum's generic query rejection.
    pub limit: Option<String>,
}

/// Parse a client-supplied kind. Status is system-only and rejected here,
/// before the store ever sees it.
fn parse_client_kind(kind: &str) -> Result<MessageKind, AppError> {
    match kind.parse::<MessageKind>() {
        Ok(MessageKind::Status) | Err(_) => Err(AppError::validation(
            "'kind' must be broadcast-message or private-message",
        )),
        Ok(kind) => Ok(kind),
    }
}

fn parse_message_id(id: &str) -> Result<Uuid, AppError> {
    id.parse::<Uuid>()
        .map_err(|_| AppError(plaza_types::error::ChatError::NotFound(format!(
            "message '{id}' not found"
        ))))
}

/// POST /messages - create a message from the `user` header's participant.
pub async fn create(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
    Json(body): Json<MessageBody>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let kind = parse_client_kind(&body.kind)?;
    let message = state
        .messages
        .create(MessageDraft {
            from: user,
            to: body.to,
            text: body.text,
            kind,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /messages - messages visible to the requester, oldest first.
pub async fn list(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let limit = match query.limit.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::validation("'limit' must be an integer"))?,
        ),
    };

    let messages = state.messages.list_visible_to(&user, limit).await?;
    Ok(Json(messages))
}

/// PUT /messages/:id - replace an owned message's to/text/kind.
pub async fn update(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
    Path(id): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let id = parse_message_id(&id)?;
    let kind = parse_client_kind(&body.kind)?;
    let message = state
        .messages
        .update(
            &id,
            &user,
            MessagePatch {
                to: body.to,
                text: body.text,
                kind,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /messages/:id - remove an owned message.
pub async fn delete(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_message_id(&id)?;
    state.messages.delete(&id, &user).await?;
    Ok(StatusCode::OK)
}
