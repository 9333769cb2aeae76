//! Server configuration.
//!
//! Sources, lowest priority first: built-in defaults, `~/.config/heapcal/config.toml`,
//! then `HEAPCAL_*` environment variables. The model provider key is read from
//! `OPENAI_API_KEY` and never written to disk.

use std::path::{Path, PathBuf};

use ::config::{Config as Layers, Environment, File};
use serde::Deserialize;

use crate::error::{HeapcalError, HeapcalResult};

static DEFAULT_BIND: &str = "127.0.0.1:5000";
static DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
static DEFAULT_CHAT_MODEL: &str = "gpt-4o";
static DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("heapcal").join("calendar.json"))
        .unwrap_or_else(|| PathBuf::from("data/calendar.json"))
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_transcription_model() -> String {
    DEFAULT_TRANSCRIPTION_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JSON document holding events, categories and settings
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: default_data_file(),
            bind: default_bind(),
            openai_base_url: default_openai_base_url(),
            chat_model: default_chat_model(),
            transcription_model: default_transcription_model(),
            request_timeout_secs: default_request_timeout_secs(),
            openai_api_key: None,
        }
    }
}

impl Config {
    pub fn config_path() -> HeapcalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HeapcalError::Config("Could not determine config directory".into()))?
            .join("heapcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file first if needed.
    pub fn load() -> HeapcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> HeapcalResult<Self> {
        let mut config: Config = Layers::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("HEAPCAL").try_parsing(true))
            .build()
            .map_err(|e| HeapcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HeapcalError::Config(e.to_string()))?;

        config.openai_api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(config)
    }

    /// The data file with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HeapcalResult<()> {
        let contents = format!(
            "\
# heapcal configuration

# Where events, categories and settings are stored:
# data_file = \"{}\"

# Address the HTTP server listens on:
# bind = \"{}\"

# Language-model provider (the API key comes from ${}):
# openai_base_url = \"{}\"
# chat_model = \"{}\"
# transcription_model = \"{}\"
# request_timeout_secs = {}
",
            default_data_file().display(),
            DEFAULT_BIND,
            API_KEY_ENV,
            DEFAULT_OPENAI_BASE_URL,
            DEFAULT_CHAT_MODEL,
            DEFAULT_TRANSCRIPTION_MODEL,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HeapcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HeapcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
