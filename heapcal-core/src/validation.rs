//! Request-shape validation.

use serde::{Deserialize, Deserializer, Serialize};

/// A single problem with one field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// camelCase field name as it appears on the wire (empty for whole-body errors)
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Checks that serde alone can't express.
pub trait Validate {
    fn validate(&self) -> Vec<FieldError>;
}

/// Patch codec for nullable fields: absent is `None`, explicit `null` is `Some(None)`.
///
/// Use with `#[serde(default, deserialize_with = "crate::validation::nullable")]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Decoder for fields that older data stores as `null`: `null` reads like an absent field.
///
/// Use with `#[serde(default, deserialize_with = "crate::validation::null_as_default")]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn require_non_blank(errors: &mut Vec<FieldError>, path: &str, value: Option<&str>) {
    if value.is_some_and(|v| v.trim().is_empty()) {
        errors.push(FieldError::new(path, "must not be empty"));
    }
}

pub(crate) fn require_color(errors: &mut Vec<FieldError>, path: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    let hex = value.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        errors.push(FieldError::new(path, "must be a hex color like #6B4EFF"));
    }
}
