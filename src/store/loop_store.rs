//! LoopStore: the authoritative, ordered loop collection.
//!
//! The collection is held in memory and written back as one JSON array to a
//! single key of a [`KeyValueStore`] after every mutation. In-memory state wins
//! when a write fails; the failure is logged and the next mutation tries again.

use std::collections::HashSet;

use crate::domain::{Loop, LoopStatus, LoopUpdate};
use crate::error::{LoopsError, Result};
use crate::storage::{DEFAULT_KEY, KeyValueStore};

/// Suffix of the key unreadable payloads are copied to before they get overwritten.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Owns the loop collection and its storage backend.
///
/// Loops are kept newest-first: `create` prepends.
#[derive(Debug)]
pub struct LoopStore<S: KeyValueStore> {
    storage: S,
    key: String,
    loops: Vec<Loop>,
}

impl<S: KeyValueStore> LoopStore<S> {
    /// Hydrate a store from the default key.
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, DEFAULT_KEY)
    }

    /// Hydrate a store from `key`.
    ///
    /// Never fails: missing data gives an empty collection, unreadable data is
    /// logged, backed up and replaced by an empty collection.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            loops: Vec::new(),
        };
        store.reload();
        store
    }

    /// Discard in-memory state and read the collection from storage again.
    pub fn reload(&mut self) {
        self.loops = self.read_collection();
        log::info!("Loaded {} loops from '{}'", self.loops.len(), self.key);
    }

    fn read_collection(&mut self) -> Vec<Loop> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No data stored at '{}', starting empty", self.key);
                return Vec::new();
            }
            Err(e) => {
                log::error!("Failed to read loops from '{}': {}", self.key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Loop>>(&raw) {
            Ok(loops) => normalize_collection(loops),
            Err(e) => {
                log::error!("Failed to parse loops stored at '{}': {}", self.key, e);
                self.backup_corrupt(&raw);
                Vec::new()
            }
        }
    }

    fn backup_corrupt(&mut self, raw: &str) {
        let backup_key = format!("{}{}", self.key, CORRUPT_SUFFIX);
        match self.storage.set(&backup_key, raw) {
            Ok(()) => log::warn!("Kept unreadable loop data under '{}'", backup_key),
            Err(e) => log::error!("Failed to back up unreadable loop data: {}", e),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All loops in collection order (newest first)
    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn get(&self, id: &str) -> Option<&Loop> {
        self.loops.iter().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Find a loop by full id or unique id prefix.
    pub fn resolve_id(&self, prefix: &str) -> Result<Option<&Loop>> {
        if prefix.is_empty() {
            return Ok(None);
        }
        if let Some(exact) = self.get(prefix) {
            return Ok(Some(exact));
        }

        let mut matches = self.loops.iter().filter(|l| l.id.starts_with(prefix));
        let first = matches.next();
        let rest = matches.count();
        if rest > 0 {
            return Err(LoopsError::AmbiguousId {
                prefix: prefix.to_string(),
                count: rest + 1,
            });
        }
        Ok(first)
    }

    /// Create a new open loop and put it at the front of the collection.
    pub fn create(&mut self, content: &str, tags: Vec<String>, energy_level: Option<u8>) -> Result<Loop> {
        let record = Loop::new(content, tags, energy_level)?;
        log::info!("Created loop {}", record.id);
        self.loops.insert(0, record.clone());
        self.persist_best_effort();
        Ok(record)
    }

    /// Merge `update` into the loop with `id`.
    ///
    /// Returns false (and does nothing) if no loop has that id.
    pub fn update(&mut self, id: &str, update: LoopUpdate) -> Result<bool> {
        let Some(record) = self.loops.iter_mut().find(|l| l.id == id) else {
            log::debug!("Update of unknown loop {} ignored", id);
            return Ok(false);
        };
        record.apply(update)?;
        log::info!("Updated loop {}", id);
        self.persist_best_effort();
        Ok(true)
    }

    /// Remove the loop with `id`. Returns false if there was none.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.loops.len();
        self.loops.retain(|l| l.id != id);
        if self.loops.len() == before {
            log::debug!("Delete of unknown loop {} ignored", id);
            return false;
        }
        log::info!("Deleted loop {}", id);
        self.persist_best_effort();
        true
    }

    /// Flip a loop between open and closed, returning its new status.
    pub fn toggle_status(&mut self, id: &str) -> Option<LoopStatus> {
        let Some(record) = self.loops.iter_mut().find(|l| l.id == id) else {
            log::debug!("Toggle of unknown loop {} ignored", id);
            return None;
        };
        let status = record.toggle();
        log::info!("Loop {} is now {}", id, status);
        self.persist_best_effort();
        Some(status)
    }

    /// Write the whole collection to storage.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.loops)?;
        self.storage.set(&self.key, &json)?;
        log::debug!("Persisted {} loops to '{}'", self.loops.len(), self.key);
        Ok(())
    }

    fn persist_best_effort(&mut self) {
        if let Err(e) = self.persist() {
            log::error!("Failed to save loops to '{}': {}", self.key, e);
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Repair loaded records and drop repeated ids (first occurrence wins).
fn normalize_collection(loops: Vec<Loop>) -> Vec<Loop> {
    let mut seen = HashSet::with_capacity(loops.len());
    let mut out = Vec::with_capacity(loops.len());
    for mut record in loops {
        if !seen.insert(record.id.clone()) {
            log::warn!("Dropping duplicate loop id {}", record.id);
            continue;
        }
        record.normalize();
        out.push(record);
    }
    out
}
