//! Core types for heapcal.
//!
//! This crate owns everything the server keeps on disk:
//! - `Event`, `Category` and `Settings` records and their create/patch forms
//! - `Store`, the JSON file mirror
//! - `Repository`, the in-memory collections with write-through persistence

pub mod category;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod repository;
pub mod settings;
pub mod store;
pub mod timestamp;
pub mod validation;

pub use category::{Category, CategoryId, CategoryPatch, DEFAULT_CATEGORY_ID, NewCategory};
pub use self::config::Config;
pub use document::{Document, Snapshot};
pub use error::{HeapcalError, HeapcalResult};
pub use event::{Event, EventId, EventKind, EventPatch, NewEvent};
pub use repository::Repository;
pub use settings::{CalendarView, Settings, SettingsPatch};
pub use store::Store;
pub use validation::{FieldError, Validate};

/// Color assigned to events and categories that don't specify one.
pub const DEFAULT_COLOR: &str = "#6B4EFF";
