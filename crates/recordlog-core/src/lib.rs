//! RecordLog Core - leveled, file-based logging facade
//!
//! This crate routes leveled messages into per-level rotating log files:
//! - Frozen configuration merged from optional overrides
//! - Lazily created per-key writers behind a locked registry
//! - Enrichment with run id, process id and ambient request info
//! - Fixed `###`-separated line layout
//! - Daily rotation with retention purge
//! - Opt-in caller-location annotation
//! - Diagnostic events through `tracing`

pub mod config;
pub mod enrich;
pub mod errors;
pub mod facade;
pub mod format;
pub mod level;
pub mod logging_facility;
pub mod record;
pub mod registry;
pub mod rotation;
pub mod trace;
pub mod writer;

pub use recordlog_core_types::schema;

// Re-export commonly used types
pub use config::{Config, FileMode, LogOptions};
pub use errors::{ErrorKind, RecordLogError, Result};
pub use facade::{RecordLog, RecordLogBuilder};
pub use level::{parse_level, Level};
pub use record::{context_from, Context, Record};
pub use trace::CallSite;
pub use writer::LevelWriter;
