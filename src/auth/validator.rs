//! Authentication validator
//!
//! Checks the password carried in the request path against the shared
//! secret. Comparison is constant-time in the content, so response timing
//! does not leak how much of a guess was right. The secret's length is not
//! hidden.

use subtle::ConstantTimeEq;

use super::credentials::SharedSecret;
use crate::error::AuthError;

/// Validates that `provided` matches the configured secret.
///
/// An empty configured secret never matches, so a server started without
/// a password refuses every request.
pub fn validate_password(provided: &str, secret: &SharedSecret) -> Result<(), AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidPassword);
    }

    let provided = provided.as_bytes();
    let expected = secret.as_bytes();
    // `ct_eq` on slices of different lengths is false without comparing bytes
    if bool::from(provided.ct_eq(expected)) {
        Ok(())
    } else {
        Err(AuthError::InvalidPassword)
    }
}
