//! Per-key formatted writer
//!
//! A `LevelWriter` owns one rotating file exclusively. It drops records below
//! its floor, then under its own lock stamps the record with the current
//! time, runs its enrichment steps, formats the line and appends it. Stamping
//! under the lock keeps timestamps monotonic per file, so a record never
//! lands in a file rotated for a later day than its own.

use crate::enrich::Enricher;
use crate::errors::{RecordLogError, Result};
use crate::format::LineFormatter;
use crate::level::Level;
use crate::record::Record;
use crate::rotation::{Clock, RotatingFile, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct LevelWriter {
    key: String,
    floor: Level,
    path: PathBuf,
    formatter: LineFormatter,
    enrichers: Vec<Arc<dyn Enricher>>,
    clock: Arc<dyn Clock>,
    sink: Mutex<RotatingFile>,
}

impl LevelWriter {
    pub fn new(
        key: impl Into<String>,
        floor: Level,
        sink: RotatingFile,
        formatter: LineFormatter,
        enrichers: Vec<Arc<dyn Enricher>>,
    ) -> Self {
        Self {
            key: key.into(),
            floor,
            path: sink.path().to_path_buf(),
            formatter,
            enrichers,
            clock: Arc::new(SystemClock),
            sink: Mutex::new(sink),
        }
    }

    /// Time source used to stamp records
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Key this writer was created for
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Records below this level are dropped
    pub fn floor(&self) -> Level {
        self.floor
    }

    /// Active file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handles(&self, level: Level) -> bool {
        level >= self.floor
    }

    /// Stamp, enrich, format and append one record
    ///
    /// The record's `datetime` is replaced by the clock reading taken once
    /// the file lock is held. Returns `Ok(false)` when the record is below
    /// the floor.
    ///
    /// # Errors
    ///
    /// Returns the formatting or I/O error of the single write attempt.
    pub fn write(&self, mut record: Record) -> Result<bool> {
        if !self.handles(record.level) {
            return Ok(false);
        }

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| RecordLogError::LockPoisoned { what: "log file" })?;
        record.datetime = self.clock.now();
        for step in &self.enrichers {
            step.enrich(&mut record);
        }
        let line = self.formatter.format(&record)?;
        sink.write_line(record.datetime, &line)?;
        Ok(true)
    }
}

impl std::fmt::Debug for LevelWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelWriter")
            .field("key", &self.key)
            .field("floor", &self.floor)
            .field("path", &self.path)
            .field("enrichers", &self.enrichers.len())
            .finish()
    }
}
