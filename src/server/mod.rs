//! Server core functionality
//!
//! Router assembly, shared state, and the listener that serves them.

pub mod core;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::handlers::panic_response;
use crate::middleware::{log_request, require_password};
use crate::protocol::handlers;

pub use self::core::Server;
pub use state::AppState;

/// Assemble the application router.
///
/// Every archive route sits under `/{password}/` and passes through the
/// password check. `/`, unknown paths and unsupported methods answer with
/// the failure envelope.
pub fn app(state: AppState) -> Router {
    let body_limit = state.body_limit();
    let api = Router::new()
        .route("/:password/list", get(handlers::list_archives))
        .route("/:password/load", get(handlers::load_archive_by_query))
        .route("/:password/load/:archive_name", get(handlers::load_archive))
        .route("/:password/save", post(handlers::save_archive_from_body))
        .route("/:password/save/:archive_name", post(handlers::save_archive))
        .route("/:password/delete", delete(handlers::delete_archive_by_query))
        .route(
            "/:password/delete/:archive_name",
            delete(handlers::delete_archive),
        )
        .route_layer(from_fn_with_state(state.clone(), require_password))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    // Only covers routes already added, so it goes after the merge
    Router::new()
        .route("/", get(handlers::root))
        .merge(api)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::unknown_route)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(log_request))
}
