//! Language-model helpers for heapcal.
//!
//! Everything here relays a prompt to a chat-completions API and hands back the
//! model's JSON untouched. There is no local scheduling logic and no retrying.

mod advisor;
mod error;
mod openai;
mod prompts;

pub use advisor::{Advisor, VoiceTask};
pub use error::{AdvisorError, AdvisorResult};
pub use openai::OpenAiAdvisor;
