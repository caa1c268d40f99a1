//! HTTP request handlers for the Plaza API.

pub mod message;
pub mod participant;
pub mod status;
