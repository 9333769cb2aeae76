pub mod ai;
pub mod categories;
pub mod events;
pub mod settings;
pub mod transfer;

use axum::{
    Json,
    extract::{FromRequest, Request, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use heapcal_advisor::AdvisorError;
use heapcal_core::{FieldError, NewCategory, NewEvent, Validate};
use heapcal_core::{CategoryPatch, EventPatch, SettingsPatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Raw upstream or internal error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level validation problems
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    fn message(message: impl Into<String>) -> Self {
        ErrorResponse {
            message: message.into(),
            error: None,
            errors: Vec::new(),
        }
    }
}

pub enum ApiError {
    /// Request body doesn't match the expected shape (400)
    Validation {
        message: &'static str,
        errors: Vec<FieldError>,
    },
    /// Request is missing something required (400)
    BadRequest(&'static str),
    /// No record under that id (404)
    NotFound(&'static str),
    /// Uploaded file is over the size limit (413)
    PayloadTooLarge,
    /// Multipart stream couldn't be read
    Multipart(MultipartError),
    /// The model provider key isn't configured (500)
    MissingApiKey,
    /// The model call failed (500)
    Upstream {
        message: &'static str,
        source: AdvisorError,
    },
    /// Anything else (500)
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn upstream(message: &'static str) -> impl FnOnce(AdvisorError) -> Self {
        move |source| ApiError::Upstream { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    errors,
                    ..ErrorResponse::message(message)
                },
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::message(message))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::message(message)),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::message(format!(
                    "File too large (max {} MB)",
                    ai::MAX_UPLOAD_BYTES / (1024 * 1024)
                )),
            ),
            ApiError::Multipart(err) => (err.status(), ErrorResponse::message(err.body_text())),
            ApiError::MissingApiKey => {
                error!("model provider API key is missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::message(AdvisorError::MissingApiKey.to_string()),
                )
            }
            ApiError::Upstream { message, source } => {
                error!(error = %source, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: Some(source.to_string()),
                        ..ErrorResponse::message(message)
                    },
                )
            }
            ApiError::Internal(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: Some(err.to_string()),
                        ..ErrorResponse::message("Internal server error")
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convert anyhow-compatible errors into internal errors
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Parse a path id. Ids that aren't integers can't name a record, so they're not found.
pub fn parse_id(raw: &str, not_found: &'static str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::NotFound(not_found))
}

/// A JSON request body that is decoded and validated before reaching a handler.
pub trait RequestBody: DeserializeOwned + Validate {
    /// Top-level message when the body is rejected
    const INVALID: &'static str;
}

impl RequestBody for NewEvent {
    const INVALID: &'static str = "Invalid event data";
}

impl RequestBody for EventPatch {
    const INVALID: &'static str = "Invalid event data";
}

impl RequestBody for NewCategory {
    const INVALID: &'static str = "Invalid category data";
}

impl RequestBody for CategoryPatch {
    const INVALID: &'static str = "Invalid category data";
}

impl RequestBody for SettingsPatch {
    const INVALID: &'static str = "Invalid settings data";
}

/// Turn a serde message into a field error, naming the field when serde does.
fn decode_error(err: &serde_json::Error) -> FieldError {
    let message = err.to_string();
    let path = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
        .unwrap_or_default()
        .to_string();
    FieldError::new(path, message)
}

/// Extractor for validated JSON bodies; rejections become 400s with field detail.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: RequestBody + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = |errors| ApiError::Validation {
            message: T::INVALID,
            errors,
        };

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| invalid(vec![FieldError::new("", rejection.body_text())]))?;

        let body: T = serde_json::from_value(value).map_err(|e| invalid(vec![decode_error(&e)]))?;

        let errors = body.validate();
        if !errors.is_empty() {
            return Err(invalid(errors));
        }

        Ok(ValidJson(body))
    }
}
