//! Whole-document export and import

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routes::ApiError;
use crate::state::AppState;

const EXPORT_FILE_NAME: &str = "calendar-data.json";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/export", get(export))
        .route("/api/import", post(import))
}

/// GET /api/export - Download the full document
async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.repo().await.export_document()?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILE_NAME}"),
            ),
        ],
        body,
    ))
}

/// Request body for an import: the exported document as a string
#[derive(Deserialize)]
pub struct ImportRequest {
    #[serde(rename = "jsonData", default)]
    pub json_data: Option<Value>,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
}

/// POST /api/import - Replace everything with a previously exported document
async fn import(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, ApiError> {
    let json_data = match payload {
        Ok(Json(ImportRequest {
            json_data: Some(Value::String(data)),
        })) if !data.is_empty() => data,
        Ok(Json(ImportRequest {
            json_data: None | Some(Value::Null | Value::String(_)),
        }))
        | Err(_) => return Err(ApiError::BadRequest("No JSON data provided")),
        Ok(_) => return Err(ApiError::BadRequest("Invalid JSON data format")),
    };

    if !state.repo_mut().await.import_document(&json_data) {
        return Err(ApiError::BadRequest("Invalid JSON data format"));
    }

    Ok(Json(ImportResponse {
        message: "Data imported successfully",
    }))
}
