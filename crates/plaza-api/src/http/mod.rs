//! HTTP/REST API layer for Plaza.
//!
//! Axum-based API exposing the presence and message endpoints, with a
//! single error-to-status translation and CORS support. Clients poll
//! `GET /messages`; there is no push channel.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
