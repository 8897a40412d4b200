//! Facade configuration
//!
//! `LogOptions` is the override mapping a host hands in (all fields optional,
//! deserializable from any serde format). `Config` is the frozen result of
//! merging those overrides over the defaults; it is built once at facade
//! construction and never mutated afterwards.

use crate::level::{parse_level, Level};
use serde::Deserialize;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Default channel label
pub const DEFAULT_CHANNEL: &str = "recordlog";

/// Default mode applied to created log files
pub const DEFAULT_FILE_PERMISSION: u32 = 0o666;

/// Default severity floor
pub const DEFAULT_LEVEL: Level = Level::Debug;

/// Supplies the directory used when no `path` option is given
pub trait RuntimeDirProvider {
    /// Directory for log files when the host configured none
    fn default_log_dir(&self) -> PathBuf;
}

/// Platform data directory (`<data_local_dir>/recordlog/logs`), falling back
/// to the temp directory on platforms without one
#[derive(Debug, Clone, Copy, Default)]
pub struct DataDirProvider;

impl RuntimeDirProvider for DataDirProvider {
    fn default_log_dir(&self) -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("recordlog")
            .join("logs")
    }
}

/// Option overrides merged over the defaults
///
/// Absent fields keep their default. The merge is shallow.
///
/// # Example
///
/// ```
/// use recordlog_core::config::LogOptions;
///
/// let options: LogOptions =
///     serde_json::from_str(r#"{"channel": "Platform", "max_files": 7}"#).unwrap();
/// assert_eq!(options.channel.as_deref(), Some("Platform"));
/// assert!(options.path.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub path: Option<String>,
    pub level: Option<String>,
    pub max_files: Option<usize>,
    pub file_permission: Option<u32>,
    pub channel: Option<String>,
    pub close: Option<bool>,
    pub single_file: Option<String>,
    pub trace: Option<bool>,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }

    pub fn file_permission(mut self, mode: u32) -> Self {
        self.file_permission = Some(mode);
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn close(mut self, close: bool) -> Self {
        self.close = Some(close);
        self
    }

    pub fn single_file(mut self, stem: impl Into<String>) -> Self {
        self.single_file = Some(stem.into());
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = Some(trace);
        self
    }
}

/// How records map to files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMode {
    /// One file per level key (`error.log`, `info.log`, ...)
    PerLevel,
    /// Every record goes to `{stem}.log`
    Single { stem: String },
}

/// Frozen facade configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    path: String,
    channel: String,
    max_files: usize,
    file_permission: u32,
    min_level: Level,
    enabled: bool,
    file_mode: FileMode,
    trace: bool,
}

impl Config {
    /// Merge options over the defaults, using the platform data directory
    /// when no path is given
    pub fn from_options(options: LogOptions) -> Self {
        Self::from_options_with(options, &DataDirProvider)
    }

    /// Merge options over the defaults with an explicit directory provider
    pub fn from_options_with(options: LogOptions, dirs: &dyn RuntimeDirProvider) -> Self {
        let path = match options.path.as_deref() {
            Some(p) if !p.is_empty() => normalize_dir(p),
            _ => normalize_dir(&dirs.default_log_dir().to_string_lossy()),
        };

        let min_level = match options.level.as_deref() {
            None => DEFAULT_LEVEL,
            Some(name) => match parse_level(name) {
                (level, true) => level,
                (_, false) => {
                    tracing::warn!(
                        component = module_path!(),
                        op = "config",
                        level = name,
                        "unrecognized level option, recording everything"
                    );
                    DEFAULT_LEVEL
                }
            },
        };

        let file_mode = match options.single_file {
            Some(stem) => FileMode::Single { stem },
            None => FileMode::PerLevel,
        };

        Self {
            path,
            channel: options
                .channel
                .unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            max_files: options.max_files.unwrap_or(0),
            file_permission: options.file_permission.unwrap_or(DEFAULT_FILE_PERMISSION),
            min_level,
            enabled: !options.close.unwrap_or(false),
            file_mode,
            trace: options.trace.unwrap_or(false),
        }
    }

    /// Log directory, always ending in exactly one separator
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Log directory as a path
    pub fn dir(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Retained rotated files per key; 0 keeps everything
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn file_permission(&self) -> u32 {
        self.file_permission
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn file_mode(&self) -> &FileMode {
        &self.file_mode
    }

    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Active file for a key: `{path}{key}.log`
    ///
    /// Keys that could leave the log directory are replaced by `info`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        PathBuf::from(format!("{}{}.log", self.path, file_key(key)))
    }
}

/// The key as a file stem, or `info` when it holds a path separator or `..`
pub fn file_key(key: &str) -> &str {
    let escapes = key.contains(['/', '\\', MAIN_SEPARATOR, '\0']) || key.contains("..");
    if escapes {
        Level::Info.key()
    } else {
        key
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_options(LogOptions::default())
    }
}

/// Ensure a directory string ends in exactly one separator
///
/// Idempotent: `normalize_dir(normalize_dir(p)) == normalize_dir(p)`.
pub fn normalize_dir(path: &str) -> String {
    let trimmed = path.trim_end_matches(|c: char| c == '/' || c == MAIN_SEPARATOR);
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push_str(trimmed);
    out.push(MAIN_SEPARATOR);
    out
}
