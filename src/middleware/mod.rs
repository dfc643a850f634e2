//! Server middleware
//!
//! Provides request logging and shared-secret enforcement.

pub mod logging;
pub mod security;

pub use logging::log_request;
pub use security::require_password;
