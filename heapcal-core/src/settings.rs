//! The singleton settings record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{CategoryId, DEFAULT_CATEGORY_ID};
use crate::timestamp;
use crate::validation::{self, FieldError, Validate};

/// Settings always live under this id.
pub const SETTINGS_ID: i64 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

fn settings_id() -> i64 {
    SETTINGS_ID
}

fn default_category() -> Option<CategoryId> {
    Some(DEFAULT_CATEGORY_ID)
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    "dark".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "settings_id")]
    pub id: i64,
    #[serde(default)]
    pub default_view: CalendarView,
    #[serde(default = "default_category")]
    pub default_category: Option<CategoryId>,
    #[serde(rename = "useAI", default = "default_true")]
    pub use_ai: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "Utc::now", with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            id: SETTINGS_ID,
            default_view: CalendarView::default(),
            default_category: default_category(),
            use_ai: true,
            theme: default_theme(),
            last_updated: timestamp::stamp_after(None),
        }
    }
}

impl Settings {
    /// Merge a patch and stamp a fresh, strictly later `lastUpdated`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(default_view) = patch.default_view {
            self.default_view = default_view;
        }
        if let Some(default_category) = patch.default_category {
            self.default_category = default_category;
        }
        if let Some(use_ai) = patch.use_ai {
            self.use_ai = use_ai;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_updated = timestamp::stamp_after(Some(self.last_updated));
    }
}

/// Body of a settings update. `id` and `lastUpdated` are server-owned and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub default_view: Option<CalendarView>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub default_category: Option<Option<CategoryId>>,
    #[serde(rename = "useAI", default)]
    pub use_ai: Option<bool>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl Validate for SettingsPatch {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validation::require_non_blank(&mut errors, "theme", self.theme.as_deref());
        errors
    }
}
