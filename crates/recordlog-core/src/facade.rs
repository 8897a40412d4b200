//! The logging facade
//!
//! `RecordLog` owns the frozen configuration and the writer registry. Every
//! severity method funnels through [`RecordLog::log`], which normalizes the
//! level, resolves (or lazily creates) the writer for its key and appends one
//! formatted line.
//!
//! # Example
//!
//! ```no_run
//! use recordlog_core::{context_from, LogOptions, RecordLog};
//! use serde_json::json;
//!
//! let log = RecordLog::new(
//!     LogOptions::new()
//!         .channel("Platform")
//!         .path("/var/log/platform"),
//! );
//! log.error("disk full", context_from(json!({"code": 500})))?;
//! # Ok::<(), recordlog_core::RecordLogError>(())
//! ```

use crate::config::{
    file_key, Config, DataDirProvider, FileMode, LogOptions, RuntimeDirProvider,
};
use crate::enrich::{standard_enrichers, NoRequest, RequestInfoProvider};
use crate::errors::Result;
use crate::format::LineFormatter;
use crate::level::{parse_level, Level};
use crate::record::{Context, Record};
use crate::registry::WriterRegistry;
use crate::rotation::{Clock, RotatingFile, SystemClock};
use crate::trace::{CallSite, MessageHook, TraceAnnotation};
use crate::writer::LevelWriter;
use crate::{log_op_end, log_op_error, log_op_start};
use recordlog_core_types::RunId;
use std::sync::Arc;
use std::time::Instant;

/// Level name routed into the debug writer
pub const SQL_LEVEL: &str = "sql";

/// Leveled, file-based logging facade
pub struct RecordLog {
    config: Arc<Config>,
    registry: WriterRegistry,
    run_id: RunId,
    requests: Arc<dyn RequestInfoProvider>,
    clock: Arc<dyn Clock>,
    formatter: LineFormatter,
    message_hook: Arc<dyn MessageHook>,
}

/// Builder for hosts that need to replace a collaborator
pub struct RecordLogBuilder {
    options: LogOptions,
    dirs: Box<dyn RuntimeDirProvider>,
    requests: Arc<dyn RequestInfoProvider>,
    clock: Arc<dyn Clock>,
    message_hook: Arc<dyn MessageHook>,
}

impl RecordLogBuilder {
    /// Provider of the default directory when `path` is empty
    pub fn runtime_dir(mut self, dirs: impl RuntimeDirProvider + 'static) -> Self {
        self.dirs = Box::new(dirs);
        self
    }

    /// Provider of ambient request info
    pub fn request_info(mut self, requests: Arc<dyn RequestInfoProvider>) -> Self {
        self.requests = requests;
        self
    }

    /// Time source for record timestamps and rotation
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Pre-formatting step applied to `log_at` calls when `trace` is on
    pub fn message_hook(mut self, hook: Arc<dyn MessageHook>) -> Self {
        self.message_hook = hook;
        self
    }

    pub fn build(self) -> RecordLog {
        RecordLog {
            config: Arc::new(Config::from_options_with(self.options, self.dirs.as_ref())),
            registry: WriterRegistry::new(),
            run_id: RunId::new(),
            requests: self.requests,
            clock: self.clock,
            formatter: LineFormatter::new(),
            message_hook: self.message_hook,
        }
    }
}

impl RecordLog {
    /// Build a facade with the default collaborators
    pub fn new(options: LogOptions) -> Self {
        Self::builder(options).build()
    }

    pub fn builder(options: LogOptions) -> RecordLogBuilder {
        RecordLogBuilder {
            options,
            dirs: Box::new(DataDirProvider),
            requests: Arc::new(NoRequest),
            clock: Arc::new(SystemClock),
            message_hook: Arc::new(TraceAnnotation),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Identifier stamped as `uid` on every record of this facade
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Number of open writers
    pub fn writer_count(&self) -> usize {
        self.registry.len()
    }

    /// Keys with an open writer, sorted
    pub fn writer_keys(&self) -> Vec<String> {
        self.registry.keys()
    }

    /// Return the writer for `key`, opening `{path}{key}.log` on first use
    ///
    /// A key holding a path separator or `..` resolves to the `info` writer.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory or file cannot be created.
    pub fn resolve_writer(&self, key: &str) -> Result<Arc<LevelWriter>> {
        let key = file_key(key);
        self.registry
            .get_or_try_insert_with(key, || self.open_writer(key))
    }

    fn open_writer(&self, key: &str) -> Result<LevelWriter> {
        let started = Instant::now();
        let path = self.config.file_path(key);
        log_op_start!("open_writer", key = key, path = %path.display());

        let sink = RotatingFile::open(
            path,
            key,
            self.config.max_files(),
            self.config.file_permission(),
            self.clock.now(),
        );
        match sink {
            Ok(sink) => {
                log_op_end!(
                    "open_writer",
                    duration_ms = started.elapsed().as_millis() as u64,
                    key = key
                );
                Ok(LevelWriter::new(
                    key,
                    self.config.min_level(),
                    sink,
                    self.formatter,
                    standard_enrichers(self.run_id.clone(), Arc::clone(&self.requests)),
                )
                .with_clock(Arc::clone(&self.clock)))
            }
            Err(err) => {
                log_op_error!(
                    "open_writer",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64,
                    key = key
                );
                Err(err)
            }
        }
    }

    /// Record one message under `level`
    ///
    /// Disabled facades return `Ok(())` without touching the file system.
    /// `sql` is routed to the debug writer; unrecognized levels are
    /// recorded as `INFO` in a file named after the given level.
    ///
    /// # Errors
    ///
    /// Returns the I/O or formatting error of the single write attempt.
    pub fn log(&self, level: &str, message: impl Into<String>, context: Context) -> Result<()> {
        self.emit(level, message.into(), context, None)
    }

    /// Like [`log`](Self::log), stamping the call site when `trace` is on
    ///
    /// # Errors
    ///
    /// Same as [`log`](Self::log).
    pub fn log_at(
        &self,
        level: &str,
        message: impl Into<String>,
        context: Context,
        call_site: &CallSite,
    ) -> Result<()> {
        self.emit(level, message.into(), context, Some(call_site))
    }

    fn emit(
        &self,
        level: &str,
        message: String,
        context: Context,
        call_site: Option<&CallSite>,
    ) -> Result<()> {
        if !self.config.enabled() {
            return Ok(());
        }

        let level = if level == SQL_LEVEL {
            Level::Debug.key()
        } else {
            level
        };
        let key = match self.config.file_mode() {
            FileMode::PerLevel => level,
            FileMode::Single { stem } => stem.as_str(),
        };
        let writer = self.resolve_writer(key)?;

        let (severity, known) = parse_level(level);
        if !known {
            tracing::debug!(
                component = module_path!(),
                op = "log",
                key = key,
                level = level,
                "unrecognized level recorded as INFO"
            );
        }

        let message = match call_site {
            Some(site) if self.config.trace() => self.message_hook.apply(&message, site),
            _ => message,
        };

        let started = Instant::now();
        let record = Record::new(
            self.clock.now(),
            self.config.channel(),
            severity,
            message,
            context,
        );
        writer.write(record).map(|_| ()).map_err(|err| {
            log_op_error!(
                "write_record",
                err,
                duration_ms = started.elapsed().as_millis() as u64,
                key = key
            );
            err
        })
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn emergency(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("emergency", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn alert(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("alert", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn critical(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("critical", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn error(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("error", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn warning(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("warning", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn notice(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("notice", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn info(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("info", message, context)
    }

    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn debug(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log("debug", message, context)
    }

    /// SQL trace entries, written to the debug file
    ///
    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn sql(&self, message: impl Into<String>, context: Context) -> Result<()> {
        self.log(SQL_LEVEL, message, context)
    }
}

impl std::fmt::Debug for RecordLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLog")
            .field("config", &self.config)
            .field("run_id", &self.run_id)
            .field("writers", &self.registry.keys())
            .finish()
    }
}

/// Log through `log_at`, stamping this file, line and module path
///
/// ```no_run
/// use recordlog_core::{log_here, LogOptions, RecordLog};
///
/// let log = RecordLog::new(LogOptions::new().trace(true));
/// log_here!(log, "info", "cache warmed")?;
/// # Ok::<(), recordlog_core::RecordLogError>(())
/// ```
#[macro_export]
macro_rules! log_here {
    ($logger:expr, $level:expr, $message:expr) => {
        $crate::log_here!($logger, $level, $message, $crate::record::Context::new())
    };
    ($logger:expr, $level:expr, $message:expr, $context:expr) => {
        $logger.log_at(
            $level,
            $message,
            $context,
            &$crate::trace::CallSite::new(file!(), line!()).with_function(module_path!()),
        )
    };
}
