//! Business logic and repository trait definitions for Plaza.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, and the services built on top of them: the presence
//! registry, the message store, the ownership guard, and the eviction
//! sweeper. It depends only on `plaza-types` -- never on `plaza-infra` or
//! any database/IO crate.

pub mod auth;
pub mod message;
pub mod presence;
pub mod sanitize;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod testing;
