//! Event and heap task endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use heapcal_core::{Event, EventPatch, NewEvent};

use crate::routes::{ApiError, ValidJson, parse_id};
use crate::state::AppState;

const NOT_FOUND: &str = "Event not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/heap", get(list_heap_events))
        .route("/api/fixed-events", get(list_fixed_events))
}

/// GET /api/events - List every event and heap task
async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.repo().await.list_events())
}

/// GET /api/events/:id
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let event = state
        .repo()
        .await
        .get_event(id)
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(event))
}

/// POST /api/events - Create an event or heap task
async fn create_event(
    State(state): State<AppState>,
    ValidJson(new): ValidJson<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.repo_mut().await.create_event(new)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/:id - Merge fields into an existing event
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let event = state
        .repo_mut()
        .await
        .update_event(id, patch)
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(event))
}

/// DELETE /api/events/:id
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    if !state.repo_mut().await.delete_event(id) {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/heap - List heap tasks only
async fn list_heap_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.repo().await.list_heap_events())
}

/// GET /api/fixed-events - List fixed events only
async fn list_fixed_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.repo().await.list_fixed_events())
}
