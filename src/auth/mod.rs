//! Authentication system
//!
//! Handles the shared-secret check that guards the archive endpoints.

pub mod credentials;
pub mod validator;

pub use credentials::SharedSecret;
pub use validator::validate_password;
