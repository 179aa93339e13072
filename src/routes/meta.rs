//! Operational route handlers

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::AppState;

/// GET /healthz
///
/// Liveness probe; reports nothing beyond the process being up.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /internal/cache/stats
///
/// Cache entry counts for monitoring.
pub async fn cache_stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "cache": state.cache.stats() }))
}

/// POST /internal/cache/invalidate
///
/// Drop every cached homestay. The platform calls this after bulk catalog
/// edits instead of waiting out the TTL.
pub async fn cache_invalidate(State(state): State<AppState>) -> Json<Value> {
    state.cache.invalidate_all();
    Json(json!({ "status": "ok" }))
}

/// POST /internal/cache/invalidate/:id
///
/// Drop one cached homestay after a catalog edit.
pub async fn cache_invalidate_homestay(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<Value> {
    state.cache.invalidate_homestay(id).await;
    Json(json!({ "status": "ok" }))
}
