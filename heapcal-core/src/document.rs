//! The persisted document: every event, every category and the settings record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::category::Category;
use crate::error::HeapcalResult;
use crate::event::Event;
use crate::settings::Settings;

/// A fully loaded document.
///
/// Missing keys fall back to empty collections and default settings, so
/// `{"events": [], "categories": [], "settings": {}}` is the empty document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub settings: Settings,
}

/// Borrowed view of a document, used for saving and exporting without cloning.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub events: Vec<&'a Event>,
    pub categories: Vec<&'a Category>,
    pub settings: &'a Settings,
}

impl Snapshot<'_> {
    pub fn to_json_pretty(&self) -> HeapcalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Why an imported document was refused.
#[derive(Debug, Error)]
pub enum ImportRejection {
    #[error("not valid JSON: {0}")]
    Malformed(serde_json::Error),

    #[error("`{0}` must be an array")]
    NotAnArray(&'static str),

    #[error("`settings` is missing")]
    MissingSettings,

    #[error("invalid record: {0}")]
    InvalidRecord(serde_json::Error),
}

impl Document {
    /// What a brand new data file contains: no events, the default category
    /// and default settings.
    pub fn seed() -> Self {
        Document {
            events: Vec::new(),
            categories: vec![Category::default_category()],
            settings: Settings::default(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            events: self.events.iter().collect(),
            categories: self.categories.iter().collect(),
            settings: &self.settings,
        }
    }

    /// Parse an import payload.
    ///
    /// The top-level shape is checked before any record is decoded: `events`
    /// and `categories` must be arrays and `settings` must be present.
    pub fn parse_import(json: &str) -> Result<Self, ImportRejection> {
        let raw: Value = serde_json::from_str(json).map_err(ImportRejection::Malformed)?;

        if !raw.get("events").is_some_and(Value::is_array) {
            return Err(ImportRejection::NotAnArray("events"));
        }
        if !raw.get("categories").is_some_and(Value::is_array) {
            return Err(ImportRejection::NotAnArray("categories"));
        }
        if raw.get("settings").is_none_or(Value::is_null) {
            return Err(ImportRejection::MissingSettings);
        }

        serde_json::from_value(raw).map_err(ImportRejection::InvalidRecord)
    }
}
