/*!
 * History stores.
 *
 * Completed transformations are kept newest first. Saving a triple that
 * is already stored moves it to the front instead of duplicating it, and
 * the list is capped at a fixed number of entries.
 */

use log::debug;
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::HistoryError;
use crate::services::HistoryStore;
use crate::session::models::Session;

/// Default history file under the user's data directory
pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cipherpad")
        .join("history.json")
}

fn push_front(entries: &mut Vec<Session>, session: &Session, max_entries: usize) {
    entries.retain(|existing| existing != session);
    entries.insert(0, session.clone());
    entries.truncate(max_entries);
}

/// In-memory history
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Mutex<Vec<Session>>,
    max_entries: usize,
}

impl MemoryHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            max_entries,
        }
    }
}

impl HistoryStore for MemoryHistory {
    fn save(&self, session: &Session) -> Result<(), HistoryError> {
        push_front(&mut self.entries.lock(), session, self.max_entries);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<Session>, HistoryError> {
        Ok(self.entries.lock().clone())
    }
}

/// History persisted as a JSON array on disk
#[derive(Debug)]
pub struct JsonHistory {
    path: PathBuf,
    max_entries: usize,
    lock: Mutex<()>,
}

impl JsonHistory {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Session>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the file through a sibling temp file and a rename
    fn write(&self, entries: &[Session]) -> Result<(), HistoryError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl HistoryStore for JsonHistory {
    fn save(&self, session: &Session) -> Result<(), HistoryError> {
        let _guard = self.lock.lock();
        let mut entries = self.read()?;
        push_front(&mut entries, session, self.max_entries);
        self.write(&entries)?;
        debug!("Saved history entry ({} total) to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn entries(&self) -> Result<Vec<Session>, HistoryError> {
        let _guard = self.lock.lock();
        self.read()
    }
}
