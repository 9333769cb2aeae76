//! Event categories.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_COLOR;
use crate::validation::{self, FieldError, Validate};

pub type CategoryId = i64;

/// The category that always exists and receives orphaned events.
pub const DEFAULT_CATEGORY_ID: CategoryId = 1;

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Category {
    pub fn default_category() -> Self {
        Category {
            id: DEFAULT_CATEGORY_ID,
            name: "Default".to_string(),
            color: default_color(),
        }
    }

    pub fn from_new(id: CategoryId, new: NewCategory) -> Self {
        Category {
            id,
            name: new.name,
            color: new.color,
        }
    }

    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        NewCategory {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Validate for NewCategory {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validation::require_non_blank(&mut errors, "name", Some(&self.name));
        validation::require_color(&mut errors, "color", Some(&self.color));
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Validate for CategoryPatch {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validation::require_non_blank(&mut errors, "name", self.name.as_deref());
        validation::require_color(&mut errors, "color", self.color.as_deref());
        errors
    }
}
