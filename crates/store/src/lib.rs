//! Durable best-score store backed by a small JSON file.
//!
//! The file is a flat object of key to score, e.g. `{"tetris_best": 4200}`.
//! Values written as numeric strings (`"4200"`) are read too; anything else
//! reads as 0.
//!
//! [`JsonFileStore::open`] and [`JsonFileStore::save`] report failures as
//! [`StoreError`]. The [`BestScoreStore`] impl never fails: it logs and keeps
//! the in-memory value, so a read-only or missing data directory costs
//! persistence and nothing else.
//!
//! `set` only updates memory. The file is rewritten on `flush`, which the
//! simulation calls once per lock and on game over, and when the store is
//! dropped. A held soft drop that raises the best score row by row therefore
//! costs one write, not one per row.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

pub use blockfall_core::store::BestScoreStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("score file {} is not valid JSON: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("score file {} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
    /// Values changed since the last save attempt.
    dirty: bool,
}

impl JsonFileStore {
    /// Empty store that will write to `path` on the first flush after a `set`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Map::new(),
            dirty: false,
        }
    }

    /// Load `path`. A missing file is an empty store, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::empty(path)),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        if text.trim().is_empty() {
            return Ok(Self::empty(path));
        }

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(source) => return Err(StoreError::Json { path, source }),
        };

        match value {
            Value::Object(values) => Ok(Self {
                path,
                values,
                dirty: false,
            }),
            _ => Err(StoreError::NotAnObject(path)),
        }
    }

    /// Like [`open`](Self::open), but an unreadable file becomes an empty store.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("{}; starting with an empty score file", e);
                Self::empty(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a `set` is waiting for the next flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write all values, creating parent directories as needed.
    ///
    /// Writes a sibling temp file and renames it over the target, so a crash
    /// mid-write leaves the previous file intact.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let text = serde_json::to_string_pretty(&self.values).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

fn score_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

impl BestScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> u32 {
        self.values.get(key).map(score_from_value).unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_owned(), Value::from(value));
        self.dirty = true;
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        // A failed write is not retried until the next `set`.
        self.dirty = false;
        match self.save() {
            Ok(()) => log::debug!("saved scores to {}", self.path.display()),
            Err(e) => log::warn!("{}; best score kept in memory only", e),
        }
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        self.flush();
    }
}
