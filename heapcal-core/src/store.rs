//! JSON file mirror of the repository.
//!
//! The store has no authority of its own: it hands back whatever document is on
//! disk and overwrites it on request. Failures never propagate; `load` degrades
//! to the empty document and `save` reports `false`, both with an error log.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::document::{Document, Snapshot};
use crate::error::HeapcalResult;

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the containing directory and a seed document if either is missing.
    pub fn init(&self) -> HeapcalResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !self.path.exists() {
            let seed = Document::seed();
            fs::write(&self.path, seed.snapshot().to_json_pretty()?)?;
            info!(path = %self.path.display(), "created data file");
        }

        Ok(())
    }

    /// Read the document, or the empty document if the file is missing or malformed.
    pub fn load(&self) -> Document {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read data file");
                return Document::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(doc) => doc,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to parse data file");
                Document::default()
            }
        }
    }

    /// Overwrite the file with a pretty-printed snapshot.
    ///
    /// Writes go to a sibling temp file first and are renamed into place.
    pub fn save(&self, snapshot: &Snapshot<'_>) -> bool {
        match self.write(snapshot) {
            Ok(()) => {
                debug!(
                    path = %self.path.display(),
                    events = snapshot.events.len(),
                    categories = snapshot.categories.len(),
                    "saved data file"
                );
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to save data file");
                false
            }
        }
    }

    fn write(&self, snapshot: &Snapshot<'_>) -> HeapcalResult<()> {
        let contents = snapshot.to_json_pretty()?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
