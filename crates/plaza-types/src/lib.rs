//! Shared domain types for Plaza.
//!
//! This crate contains the core domain types used across the Plaza chat
//! backend: Participant, Message, their error taxonomy, and configuration.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod participant;
