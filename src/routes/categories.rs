//! Category endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use heapcal_core::{Category, CategoryPatch, NewCategory};

use crate::routes::{ApiError, ValidJson, parse_id};
use crate::state::AppState;

const NOT_FOUND: &str = "Category not found";
const NOT_DELETABLE: &str = "Category not found or cannot be deleted";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.repo().await.list_categories())
}

/// GET /api/categories/:id
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let category = state
        .repo()
        .await
        .get_category(id)
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(category))
}

/// POST /api/categories
async fn create_category(
    State(state): State<AppState>,
    ValidJson(new): ValidJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.repo_mut().await.create_category(new)?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let category = state
        .repo_mut()
        .await
        .update_category(id, patch)
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(category))
}

/// DELETE /api/categories/:id - Events in the category move to the default one
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, NOT_DELETABLE)?;
    if !state.repo_mut().await.delete_category(id) {
        return Err(ApiError::NotFound(NOT_DELETABLE));
    }

    Ok(StatusCode::NO_CONTENT)
}
