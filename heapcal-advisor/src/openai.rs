//! OpenAI-compatible implementation of [`Advisor`].

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use heapcal_core::{Config, Event};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::advisor::{Advisor, VoiceTask};
use crate::error::{AdvisorError, AdvisorResult};
use crate::prompts;

const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

// Request/response types for the chat-completions and transcription endpoints

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Transcription {
    text: String,
}

impl ChatMessage {
    fn system(text: &str) -> Self {
        ChatMessage {
            role: "system",
            content: MessageContent::Text(text.to_string()),
        }
    }

    fn user(text: String) -> Self {
        ChatMessage {
            role: "user",
            content: MessageContent::Text(text),
        }
    }
}

/// Client for an OpenAI-compatible API.
pub struct OpenAiAdvisor {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    transcription_model: String,
}

impl OpenAiAdvisor {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        OpenAiAdvisor {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> AdvisorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(OpenAiAdvisor {
            http,
            chat_model: config.chat_model.clone(),
            transcription_model: config.transcription_model.clone(),
            ..Self::new(config.openai_api_key.clone(), &config.openai_base_url)
        })
    }

    fn api_key(&self) -> AdvisorResult<&str> {
        self.api_key.as_deref().ok_or(AdvisorError::MissingApiKey)
    }

    async fn error_for_status(resp: reqwest::Response) -> AdvisorResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(AdvisorError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Send a chat completion in JSON mode and decode the first choice.
    async fn chat_json(&self, messages: Vec<ChatMessage>) -> AdvisorResult<Value> {
        let api_key = self.api_key()?;
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let resp = Self::error_for_status(resp).await?;

        let chat: ChatResponse = resp.json().await?;
        let choice = chat.choices.into_iter().next().ok_or(AdvisorError::NoChoices)?;
        let content = choice.message.content.unwrap_or_else(|| "{}".to_string());
        debug!(bytes = content.len(), "model replied");

        Ok(serde_json::from_str(&content)?)
    }

    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> AdvisorResult<String> {
        let api_key = self.api_key()?;
        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", Part::bytes(audio).file_name(file_name.to_string()));

        let resp = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;
        let resp = Self::error_for_status(resp).await?;

        let transcription: Transcription = resp.json().await?;
        Ok(transcription.text)
    }
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn suggest_schedule(&self, fixed: &[Event], heap: &[Event]) -> AdvisorResult<Value> {
        info!(
            fixed = fixed.len(),
            heap = heap.len(),
            "requesting schedule suggestions"
        );
        let prompt = prompts::schedule(&serde_json::to_string(fixed)?, &serde_json::to_string(heap)?);

        self.chat_json(vec![
            ChatMessage::system(prompts::SCHEDULER_SYSTEM),
            ChatMessage::user(prompt),
        ])
        .await
    }

    async fn extract_event(&self, image: &[u8], mime_type: &str) -> AdvisorResult<Value> {
        info!(bytes = image.len(), mime_type, "extracting event from screenshot");
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(image));

        self.chat_json(vec![
            ChatMessage::system(prompts::SCREENSHOT_SYSTEM),
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: prompts::SCREENSHOT_INSTRUCTIONS.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            },
        ])
        .await
    }

    async fn extract_task(&self, audio: Vec<u8>, file_name: &str) -> AdvisorResult<VoiceTask> {
        info!(bytes = audio.len(), "transcribing voice note");
        let transcription = self.transcribe(audio, file_name).await?;

        let task_details = self
            .chat_json(vec![
                ChatMessage::system(prompts::VOICE_SYSTEM),
                ChatMessage::user(prompts::voice_task(&transcription)),
            ])
            .await?;

        Ok(VoiceTask {
            transcription,
            task_details,
        })
    }

    async fn suggest_deadline(&self, title: &str, description: &str) -> AdvisorResult<Value> {
        self.chat_json(vec![
            ChatMessage::system(prompts::DEADLINE_SYSTEM),
            ChatMessage::user(prompts::deadline(title, description)),
        ])
        .await
    }
}
