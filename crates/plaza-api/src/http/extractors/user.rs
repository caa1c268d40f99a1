//! `user` header extractor.
//!
//! Identity is the self-asserted participant name carried in the `user`
//! header on every message and heartbeat request. There is no credential
//! behind it; ownership checks compare this name against a message's
//! author.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// The requesting participant's name, taken from the `user` header.
pub struct UserHeader(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserHeader {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("user")
            .ok_or_else(|| AppError::validation("'user' header is required"))?;

        let name = value
            .to_str()
            .map_err(|_| AppError::validation("'user' header must be valid UTF-8"))?
            .trim();

        if name.is_empty() {
            return Err(AppError::validation("'user' header must not be empty"));
        }

        Ok(UserHeader(name.to_string()))
    }
}
