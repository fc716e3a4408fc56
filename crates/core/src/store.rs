//! Best-score store seam
//!
//! The simulation reads and writes its persisted best score through this
//! trait instead of reaching for ambient global storage. Durable backends live
//! outside the core; [`MemoryStore`] is the in-process fake used by tests and
//! headless runs.

use std::collections::HashMap;

/// Minimal key-value contract for the persisted best score
///
/// `get` returns 0 when the key is absent or its value cannot be read. `set`
/// overwrites; the simulation only ever calls it with non-decreasing values.
/// `set` may buffer: the simulation calls `flush` after every lock and on game
/// over, which is where durable backends should write.
pub trait BestScoreStore {
    fn get(&self, key: &str) -> u32;
    fn set(&mut self, key: &str, value: u32);

    fn flush(&mut self) {}
}

impl<T: BestScoreStore + ?Sized> BestScoreStore for Box<T> {
    fn get(&self, key: &str) -> u32 {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u32) {
        (**self).set(key, value)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// Non-durable store backed by a map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
    writes: u32,
    flushes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    pub fn with_value(key: &str, value: u32) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value);
        store
    }

    /// Number of `set` calls observed.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Number of `flush` calls observed.
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl BestScoreStore for MemoryStore {
    fn get(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.writes += 1;
        self.values.insert(key.to_owned(), value);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
