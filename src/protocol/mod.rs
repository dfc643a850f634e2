//! HTTP protocol
//!
//! Request handlers and the JSON response envelopes they produce.

pub mod handlers;
pub mod responses;

pub use handlers::{NameQuery, SaveRequest};
pub use responses::{FailureResponse, ListResponse, LoadResponse, MessageResponse};
