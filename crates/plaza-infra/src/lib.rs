//! Infrastructure layer for Plaza.
//!
//! Contains the SQLite implementations of the repository traits defined in
//! `plaza-core`.

pub mod sqlite;
