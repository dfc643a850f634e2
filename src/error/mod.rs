//! Error handling
//!
//! Defines error types and their HTTP rendering for the sync server.

pub mod handlers;
pub mod types;

pub use types::*;
