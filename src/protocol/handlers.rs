//! HTTP handlers
//!
//! One handler per archive operation and API revision. Revision 1 carries
//! the archive name as a path segment; revision 2 uses the `name` query
//! parameter, or for saves the `name` body field with the document's own
//! `archive_name` key as fallback.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;

use crate::error::{ApiError, StorageError};
use crate::protocol::responses::{
    DELETED_MESSAGE, ListResponse, LoadResponse, MessageResponse, SAVED_MESSAGE,
};
use crate::server::state::AppState;
use crate::storage::{ArchiveName, resolve_archive_name};

/// Query string of the revision 2 load and delete routes.
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// Body of a save request.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    /// Only read by the revision 2 route; a path segment wins over it.
    #[serde(default)]
    pub name: Option<String>,
    pub data: Value,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn malformed(rejection: impl Display) -> ApiError {
    ApiError::Malformed(rejection.to_string())
}

/// Body rejections keep 413 for oversized bodies; everything else is a 400.
fn body_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        malformed(rejection)
    }
}

fn missing_name() -> ApiError {
    StorageError::InvalidRequest("missing archive name".into()).into()
}

/// `GET /` never serves data.
pub async fn root() -> ApiError {
    ApiError::AccessDenied
}

pub async fn unknown_route() -> ApiError {
    ApiError::UnknownRoute
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// `GET /{password}/list`
pub async fn list_archives(State(state): State<AppState>) -> ApiResult<ListResponse> {
    let archives = state.store().list().await?;
    Ok(Json(ListResponse::new(archives)))
}

/// `GET /{password}/load/{archive_name}`
pub async fn load_archive(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<LoadResponse> {
    let Path((_, archive_name)) = path.map_err(malformed)?;
    load(&state, &archive_name).await
}

/// `GET /{password}/load?name=...`
pub async fn load_archive_by_query(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> ApiResult<LoadResponse> {
    let Query(query) = query.map_err(malformed)?;
    let raw = query.name.ok_or_else(missing_name)?;
    load(&state, &raw).await
}

async fn load(state: &AppState, raw: &str) -> ApiResult<LoadResponse> {
    let name = ArchiveName::parse(raw)?;
    let data = state.store().load(&name).await?;
    Ok(Json(LoadResponse::new(data)))
}

/// `POST /{password}/save/{archive_name}` with `{"data": ...}`
pub async fn save_archive(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Path((_, archive_name)) = path.map_err(malformed)?;
    let Json(request) = body.map_err(body_rejection)?;
    save(&state, Some(&archive_name), request).await
}

/// `POST /{password}/save` with `{"name": ..., "data": ...}`
pub async fn save_archive_from_body(
    State(state): State<AppState>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(request) = body.map_err(body_rejection)?;
    save(&state, None, request).await
}

async fn save(
    state: &AppState,
    path_name: Option<&str>,
    request: SaveRequest,
) -> ApiResult<MessageResponse> {
    let top_level = path_name.or(request.name.as_deref());
    let name = resolve_archive_name(top_level, &request.data)?;
    state.store().save(&name, &request.data).await?;
    Ok(Json(MessageResponse::new(SAVED_MESSAGE)))
}

/// `DELETE /{password}/delete/{archive_name}`
pub async fn delete_archive(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<MessageResponse> {
    let Path((_, archive_name)) = path.map_err(malformed)?;
    delete(&state, &archive_name).await
}

/// `DELETE /{password}/delete?name=...`
pub async fn delete_archive_by_query(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> ApiResult<MessageResponse> {
    let Query(query) = query.map_err(malformed)?;
    let raw = query.name.ok_or_else(missing_name)?;
    delete(&state, &raw).await
}

async fn delete(state: &AppState, raw: &str) -> ApiResult<MessageResponse> {
    let name = ArchiveName::parse(raw)?;
    state.store().delete(&name).await?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}
