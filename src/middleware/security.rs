//! Security middleware
//!
//! Rejects API requests whose password segment does not match the shared
//! secret before they reach a handler.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;

use crate::auth::validate_password;
use crate::error::{ApiError, AuthError};
use crate::server::state::AppState;

/// Route parameter holding the access password.
pub const PASSWORD_PARAM: &str = "password";

/// Must be installed with `route_layer` so path parameters are resolved.
pub async fn require_password(
    State(state): State<AppState>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Path(params) = params.map_err(|_| AuthError::InvalidPassword)?;
    let provided = params.get(PASSWORD_PARAM).map(String::as_str).unwrap_or_default();

    validate_password(provided, state.secret())?;
    Ok(next.run(request).await)
}
