//! In-memory repository with write-through persistence.
//!
//! The repository is the single source of truth while the process runs. It is
//! filled from the store once at `open`, and every successful mutation rewrites
//! the whole document before returning. Reads never touch the disk.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::category::{Category, CategoryId, CategoryPatch, DEFAULT_CATEGORY_ID, NewCategory};
use crate::document::{Document, Snapshot};
use crate::error::{HeapcalError, HeapcalResult};
use crate::event::{Event, EventId, EventPatch, NewEvent};
use crate::settings::{SETTINGS_ID, Settings, SettingsPatch};
use crate::store::Store;

#[derive(Debug)]
pub struct Repository {
    store: Store,
    events: BTreeMap<EventId, Event>,
    categories: BTreeMap<CategoryId, Category>,
    settings: Settings,
    next_event_id: EventId,
    next_category_id: CategoryId,
}

/// One past the highest id in use, counting from 0 so the first id is 1.
/// `None` when the highest id can't be followed.
fn next_id(ids: impl Iterator<Item = i64>) -> Option<i64> {
    ids.max().unwrap_or(0).max(0).checked_add(1)
}

/// Bring a loaded or imported document in line with the data model: category 1
/// exists whenever the list would otherwise be empty, and settings sit under
/// their fixed id. Returns the next event and category ids, or `None` when the
/// document's ids are out of range.
fn normalize(doc: &mut Document) -> Option<(EventId, CategoryId)> {
    if doc.categories.is_empty() {
        doc.categories.push(Category::default_category());
    }
    doc.settings.id = SETTINGS_ID;

    Some((
        next_id(doc.events.iter().map(|e| e.id))?,
        next_id(doc.categories.iter().map(|c| c.id))?,
    ))
}

impl Repository {
    /// Initialize the store if needed and load its document.
    ///
    /// A store that can't be initialized still opens; the repository then
    /// starts from whatever `load` degrades to.
    pub fn open(store: Store) -> Self {
        if let Err(e) = store.init() {
            warn!(path = %store.path().display(), error = %e, "failed to initialize data file");
        }

        let mut doc = store.load();
        let next_ids = match normalize(&mut doc) {
            Some(next_ids) => next_ids,
            None => {
                error!(path = %store.path().display(), "ids in data file are out of range");
                doc = Document::seed();
                (1, DEFAULT_CATEGORY_ID + 1)
            }
        };

        let mut repo = Repository {
            store,
            events: BTreeMap::new(),
            categories: BTreeMap::new(),
            settings: Settings::default(),
            next_event_id: 1,
            next_category_id: 1,
        };
        repo.replace(doc, next_ids);

        info!(
            events = repo.events.len(),
            categories = repo.categories.len(),
            "loaded calendar data"
        );
        repo
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Swap in a normalized document along with its id counters.
    fn replace(&mut self, doc: Document, (next_event_id, next_category_id): (EventId, CategoryId)) {
        self.events = doc.events.into_iter().map(|e| (e.id, e)).collect();
        self.categories = doc.categories.into_iter().map(|c| (c.id, c)).collect();
        self.settings = doc.settings;
        self.next_event_id = next_event_id;
        self.next_category_id = next_category_id;
    }

    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            events: self.events.values().collect(),
            categories: self.categories.values().collect(),
            settings: &self.settings,
        }
    }

    fn persist(&self) -> bool {
        self.store.save(&self.snapshot())
    }

    // EVENTS:

    pub fn list_events(&self) -> Vec<Event> {
        self.events.values().cloned().collect()
    }

    pub fn get_event(&self, id: EventId) -> Option<Event> {
        self.events.get(&id).cloned()
    }

    pub fn list_heap_events(&self) -> Vec<Event> {
        self.events.values().filter(|e| e.is_heap()).cloned().collect()
    }

    pub fn list_fixed_events(&self) -> Vec<Event> {
        self.events.values().filter(|e| e.is_fixed()).cloned().collect()
    }

    /// Store a new event under the next id. Ids are never reused, even after deletes.
    pub fn create_event(&mut self, new: NewEvent) -> HeapcalResult<Event> {
        let id = self.next_event_id;
        self.next_event_id = id
            .checked_add(1)
            .ok_or(HeapcalError::IdsExhausted("event"))?;

        let event = Event::from_new(id, new, Utc::now());
        if event.is_fixed() && event.end_date < event.start_date {
            warn!(id, "fixed event ends before it starts");
        }

        self.events.insert(id, event.clone());
        self.persist();
        Ok(event)
    }

    pub fn update_event(&mut self, id: EventId, patch: EventPatch) -> Option<Event> {
        let event = self.events.get_mut(&id)?;
        event.apply(patch);
        let updated = event.clone();
        self.persist();
        Some(updated)
    }

    pub fn delete_event(&mut self, id: EventId) -> bool {
        let removed = self.events.remove(&id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    // CATEGORIES:

    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }

    pub fn get_category(&self, id: CategoryId) -> Option<Category> {
        self.categories.get(&id).cloned()
    }

    pub fn create_category(&mut self, new: NewCategory) -> HeapcalResult<Category> {
        let id = self.next_category_id;
        self.next_category_id = id
            .checked_add(1)
            .ok_or(HeapcalError::IdsExhausted("category"))?;

        let category = Category::from_new(id, new);
        self.categories.insert(id, category.clone());
        self.persist();
        Ok(category)
    }

    pub fn update_category(&mut self, id: CategoryId, patch: CategoryPatch) -> Option<Category> {
        let category = self.categories.get_mut(&id)?;
        category.apply(patch);
        let updated = category.clone();
        self.persist();
        Some(updated)
    }

    /// Delete a category and move its events to the default category.
    ///
    /// Refused (returns false, nothing changes) for the default category and
    /// when only one category is left.
    pub fn delete_category(&mut self, id: CategoryId) -> bool {
        if self.categories.len() <= 1 || id == DEFAULT_CATEGORY_ID {
            return false;
        }
        if self.categories.remove(&id).is_none() {
            return false;
        }

        let mut reassigned = 0;
        for event in self.events.values_mut() {
            if event.category_id == Some(id) {
                event.category_id = Some(DEFAULT_CATEGORY_ID);
                reassigned += 1;
            }
        }
        if reassigned > 0 {
            info!(category = id, reassigned, "moved events to default category");
        }

        self.persist();
        true
    }

    // SETTINGS:

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        self.settings.apply(patch);
        self.persist();
        self.settings.clone()
    }

    // IMPORT / EXPORT:

    /// Pretty-printed JSON of the full current state.
    pub fn export_document(&self) -> HeapcalResult<String> {
        self.snapshot().to_json_pretty()
    }

    /// Replace everything with an exported document.
    ///
    /// Returns false and leaves the current state untouched when the payload
    /// isn't a valid document or its ids are out of range. Imported settings
    /// get a fresh `lastUpdated`; an empty category list gets the default category.
    pub fn import_document(&mut self, json: &str) -> bool {
        let mut doc = match Document::parse_import(json) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "rejected import");
                return false;
            }
        };
        let Some(next_ids) = normalize(&mut doc) else {
            warn!("rejected import: ids are out of range");
            return false;
        };

        doc.settings.touch();
        self.replace(doc, next_ids);
        info!(
            events = self.events.len(),
            categories = self.categories.len(),
            "imported calendar data"
        );
        self.persist();
        true
    }
}
