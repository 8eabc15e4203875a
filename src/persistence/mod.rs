//! High score persistence
//!
//! A single integer survives between sessions. Backends:
//! - `MemoryStore`: process-local, shared between clones
//! - `JsonFileStore`: JSON document on disk (native), written via tmp + rename
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "Highscore";

/// Load/save capability for the persisted high score
pub trait HighScoreStore {
    /// Stored high score, 0 if nothing was saved yet
    fn load_high_score(&self) -> Result<u32, StoreError>;
    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Serialized form of the persisted value
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(rename = "Highscore")]
    pub high_score: u32,
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u32) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(score))),
        }
    }

    /// Last saved value, if any
    pub fn get(&self) -> Option<u32> {
        self.value.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Result<u32, StoreError> {
        Ok(self.value.get().unwrap_or(0))
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.value.set(Some(score));
        Ok(())
    }
}

/// JSON file on disk
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for JsonFileStore {
    fn load_high_score(&self) -> Result<u32, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "column_highscore";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load_high_score(&self) -> Result<u32, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let record: HighScoreRecord = serde_json::from_str(&json)?;
                Ok(record.high_score)
            }
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)
    }
}
