//! Request extractors for the Plaza API.

pub mod user;
