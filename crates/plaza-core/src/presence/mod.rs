//! Participant presence abstractions.
//!
//! This module defines the `ParticipantRepository` trait that the
//! infrastructure layer implements, and the `PresenceRegistry` service
//! driving the join / list / heartbeat / evict lifecycle.

pub mod registry;
pub mod repository;

pub use registry::PresenceRegistry;
pub use repository::ParticipantRepository;
