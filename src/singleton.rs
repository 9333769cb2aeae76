//! Keeps two heapcal-server processes from writing the same data file.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Holds the lock until dropped
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `calendar-data.json` is guarded by `calendar-data.json.lock` beside it.
pub fn lock_path(data_file: &Path) -> PathBuf {
    let mut name = data_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "heapcal".into());
    name.push(".lock");
    data_file.with_file_name(name)
}

/// Acquire an exclusive lock for the data file, failing if another server holds it
pub fn acquire_lock(data_file: &Path) -> Result<LockGuard> {
    let path = lock_path(data_file);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    }

    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another heapcal-server is already using {}.\n\
            If you believe this is an error, remove: {}",
            data_file.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file, path })
}
