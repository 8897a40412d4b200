//! Key → writer registry
//!
//! Lookup and creation happen under one lock, so concurrent first use of a
//! key opens exactly one file handle.

use crate::errors::{RecordLogError, Result};
use crate::writer::LevelWriter;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct WriterRegistry {
    writers: Mutex<HashMap<String, Arc<LevelWriter>>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the writer for `key`, creating it with `create` on first use
    ///
    /// A failed creation stores nothing.
    ///
    /// # Errors
    ///
    /// Returns the error from `create`, or `LockPoisoned`.
    pub fn get_or_try_insert_with<F>(&self, key: &str, create: F) -> Result<Arc<LevelWriter>>
    where
        F: FnOnce() -> Result<LevelWriter>,
    {
        let mut writers = self.lock()?;
        if let Some(existing) = writers.get(key) {
            return Ok(Arc::clone(existing));
        }
        let writer = Arc::new(create()?);
        writers.insert(key.to_string(), Arc::clone(&writer));
        Ok(writer)
    }

    /// Existing writer for `key`, without creating one
    pub fn get(&self, key: &str) -> Option<Arc<LevelWriter>> {
        self.lock().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|w| w.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys with an open writer, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|w| w.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<LevelWriter>>>> {
        self.writers
            .lock()
            .map_err(|_| RecordLogError::LockPoisoned {
                what: "writer registry",
            })
    }
}
