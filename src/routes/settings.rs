//! Settings endpoints

use axum::{Json, Router, extract::State, routing::get};

use heapcal_core::{Settings, SettingsPatch};

use crate::routes::ValidJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.repo().await.settings().clone())
}

/// PUT /api/settings - Merge fields and stamp lastUpdated
async fn update_settings(
    State(state): State<AppState>,
    ValidJson(patch): ValidJson<SettingsPatch>,
) -> Json<Settings> {
    Json(state.repo_mut().await.update_settings(patch))
}
