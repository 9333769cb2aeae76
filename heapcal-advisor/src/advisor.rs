use async_trait::async_trait;
use heapcal_core::Event;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdvisorResult;

/// Result of turning a voice note into a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceTask {
    pub transcription: String,
    /// Whatever task fields the model extracted
    pub task_details: Value,
}

/// An external model that answers scheduling questions with JSON.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Whether credentials are present. Callers check this before every request
    /// so a missing key fails fast instead of reaching the network.
    fn is_configured(&self) -> bool;

    /// Suggest slots for heap tasks around the fixed events.
    /// The reply is expected to look like `{"recommendations": [...]}`.
    async fn suggest_schedule(&self, fixed: &[Event], heap: &[Event]) -> AdvisorResult<Value>;

    /// Pull event fields out of a screenshot.
    async fn extract_event(&self, image: &[u8], mime_type: &str) -> AdvisorResult<Value>;

    /// Transcribe a voice note, then pull task fields out of the transcript.
    async fn extract_task(&self, audio: Vec<u8>, file_name: &str) -> AdvisorResult<VoiceTask>;

    /// Suggest a due date and priority for a task.
    async fn suggest_deadline(&self, title: &str, description: &str) -> AdvisorResult<Value>;
}
