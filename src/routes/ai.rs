//! AI endpoints: schedule suggestions, screenshot and voice parsing, deadlines.
//!
//! Every route checks for model credentials before calling out, so a missing
//! key fails fast. The model's JSON is relayed as-is.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State, rejection::JsonRejection},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use heapcal_advisor::{Advisor, VoiceTask};

use crate::routes::ApiError;
use crate::state::AppState;

/// Largest accepted screenshot or audio clip.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";
const DEFAULT_AUDIO_NAME: &str = "voice-input.webm";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ai/schedule", post(schedule))
        .route("/api/ai/process-screenshot", post(process_screenshot))
        .route("/api/ai/process-voice", post(process_voice))
        .route("/api/ai/suggest-deadline", post(suggest_deadline))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES))
}

fn require_configured(advisor: &dyn Advisor) -> Result<(), ApiError> {
    if advisor.is_configured() {
        Ok(())
    } else {
        Err(ApiError::MissingApiKey)
    }
}

/// A single uploaded file from a multipart form
struct Upload {
    bytes: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// Find the named file field, skipping any others.
async fn read_upload(mut multipart: Multipart, field_name: &str) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(ApiError::Multipart)? {
        if field.name() != Some(field_name) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(ApiError::Multipart)?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::PayloadTooLarge);
        }
        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(Upload {
            bytes,
            content_type,
            file_name,
        }));
    }

    Ok(None)
}

/// POST /api/ai/schedule - Ask the model where heap tasks fit
async fn schedule(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (fixed, heap) = {
        let repo = state.repo().await;
        (repo.list_fixed_events(), repo.list_heap_events())
    };
    info!(
        fixed = fixed.len(),
        heap = heap.len(),
        "starting schedule recommendation"
    );

    if heap.is_empty() {
        return Ok(Json(json!({ "recommendations": [] })));
    }

    let advisor = state.advisor();
    require_configured(advisor)?;

    let recommendations = advisor
        .suggest_schedule(&fixed, &heap)
        .await
        .map_err(ApiError::upstream(
            "Failed to generate AI scheduling recommendations",
        ))?;

    info!("generated schedule recommendations");
    Ok(Json(recommendations))
}

/// POST /api/ai/process-screenshot - Extract event fields from an image (`screenshot` field)
async fn process_screenshot(
    State(state): State<AppState>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    const NO_FILE: &str = "No screenshot provided";

    let multipart = multipart.map_err(|_| ApiError::BadRequest(NO_FILE))?;
    let upload = read_upload(multipart, "screenshot")
        .await?
        .ok_or(ApiError::BadRequest(NO_FILE))?;

    let advisor = state.advisor();
    require_configured(advisor)?;

    let mime_type = upload
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());

    let event = advisor
        .extract_event(&upload.bytes, &mime_type)
        .await
        .map_err(ApiError::upstream("Failed to process screenshot"))?;

    info!("processed screenshot");
    Ok(Json(event))
}

/// POST /api/ai/process-voice - Transcribe audio and extract a task (`audio` field)
async fn process_voice(
    State(state): State<AppState>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Json<VoiceTask>, ApiError> {
    const NO_FILE: &str = "No audio file provided";

    let multipart = multipart.map_err(|_| ApiError::BadRequest(NO_FILE))?;
    let upload = read_upload(multipart, "audio")
        .await?
        .ok_or(ApiError::BadRequest(NO_FILE))?;

    let advisor = state.advisor();
    require_configured(advisor)?;

    let file_name = upload
        .file_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIO_NAME.to_string());

    let task = advisor
        .extract_task(upload.bytes.to_vec(), &file_name)
        .await
        .map_err(ApiError::upstream("Failed to process voice input"))?;

    info!(
        transcription = %task.transcription.chars().take(100).collect::<String>(),
        "processed voice input"
    );
    Ok(Json(task))
}

#[derive(Deserialize)]
pub struct DeadlineRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/ai/suggest-deadline - Suggest a due date and priority for a task
async fn suggest_deadline(
    State(state): State<AppState>,
    payload: Result<Json<DeadlineRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Ok(Json(req)) = payload else {
        return Err(ApiError::BadRequest("Task title is required"));
    };
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::BadRequest("Task title is required"))?;

    let advisor = state.advisor();
    require_configured(advisor)?;

    let suggestion = advisor
        .suggest_deadline(&title, req.description.as_deref().unwrap_or_default())
        .await
        .map_err(ApiError::upstream("Failed to suggest deadline"))?;

    Ok(Json(suggestion))
}
