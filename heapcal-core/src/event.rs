//! Calendar events and heap tasks.
//!
//! Both live in one collection and differ only by `kind`: a fixed event has a
//! committed time slot on the calendar grid, a heap task is a flexible to-do
//! whose start/end are placeholders until it gets scheduled.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::DEFAULT_COLOR;
use crate::category::CategoryId;
use crate::timestamp;
use crate::validation::{self, FieldError, Validate};

pub type EventId = i64;

/// Length of the placeholder slot given to heap tasks created without times.
pub const HEAP_PLACEHOLDER_MINUTES: i64 = 60;

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn color_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(|color| color.unwrap_or_else(default_color))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Fixed,
    Heap,
}

/// A stored event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub is_all_day: bool,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub is_pinned: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "validation::null_as_default")]
    pub kind: EventKind,
    /// Deadline, only meaningful for heap tasks
    #[serde(default, with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Event {
    /// Build a stored record from a validated create request.
    ///
    /// Heap tasks without times get a placeholder slot starting at `now`.
    /// Callers must run `NewEvent::validate` first; a fixed event missing a
    /// time falls back to the same placeholder rather than panicking.
    pub fn from_new(id: EventId, new: NewEvent, now: DateTime<Utc>) -> Self {
        let start_date = new.start_date.unwrap_or(now);
        let end_date = new
            .end_date
            .unwrap_or(start_date + Duration::minutes(HEAP_PLACEHOLDER_MINUTES));

        Event {
            id,
            title: new.title,
            description: new.description,
            start_date,
            end_date,
            is_all_day: new.is_all_day,
            color: new.color,
            is_pinned: new.is_pinned,
            location: new.location,
            kind: new.kind,
            due_date: new.due_date,
            category_id: new.category_id,
            metadata: new.metadata,
        }
    }

    /// Shallow merge: fields present in the patch replace the stored ones.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(is_all_day) = patch.is_all_day {
            self.is_all_day = is_all_day;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(is_pinned) = patch.is_pinned {
            self.is_pinned = is_pinned;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = metadata;
        }
    }

    pub fn is_heap(&self) -> bool {
        self.kind == EventKind::Heap
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == EventKind::Fixed
    }
}

/// Body of an event create request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub is_all_day: bool,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub is_pinned: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "validation::null_as_default")]
    pub kind: EventKind,
    #[serde(default, with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl NewEvent {
    /// Minimal fixed event, mostly useful in tests and seeding.
    pub fn fixed(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        NewEvent {
            title: title.into(),
            description: None,
            start_date: Some(start),
            end_date: Some(end),
            is_all_day: false,
            color: default_color(),
            is_pinned: false,
            location: None,
            kind: EventKind::Fixed,
            due_date: None,
            category_id: None,
            metadata: None,
        }
    }

    /// Heap task without a time slot.
    pub fn heap(title: impl Into<String>) -> Self {
        NewEvent {
            start_date: None,
            end_date: None,
            kind: EventKind::Heap,
            ..NewEvent::fixed(title, Utc::now(), Utc::now())
        }
    }
}

impl Validate for NewEvent {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validation::require_non_blank(&mut errors, "title", Some(&self.title));
        validation::require_color(&mut errors, "color", Some(&self.color));

        if self.kind == EventKind::Fixed {
            if self.start_date.is_none() {
                errors.push(FieldError::new("startDate", "required for fixed events"));
            }
            if self.end_date.is_none() {
                errors.push(FieldError::new("endDate", "required for fixed events"));
            }
        }

        errors
    }
}

/// Body of an event update request. Absent fields are left untouched;
/// nullable fields are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_all_day: Option<bool>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_pinned: Option<bool>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub location: Option<Option<String>>,
    #[serde(rename = "type", default)]
    pub kind: Option<EventKind>,
    #[serde(default, deserialize_with = "timestamp::nullable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub metadata: Option<Option<serde_json::Value>>,
}

impl Validate for EventPatch {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validation::require_non_blank(&mut errors, "title", self.title.as_deref());
        validation::require_color(&mut errors, "color", self.color.as_deref());
        errors
    }
}
