use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("OpenAI API key is missing. Please set the OPENAI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no choices")]
    NoChoices,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;
