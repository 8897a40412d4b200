//! Caller-location annotation
//!
//! Call-site metadata is supplied explicitly by the caller, either with
//! [`CallSite::here`] (file and line via `#[track_caller]`) or through the
//! [`log_here!`](crate::log_here) macro, which also records the module path.
//! A [`MessageHook`] rewrites the message before formatting.

use std::panic::Location;
use std::path::Path;

/// Where a log call was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    pub function: Option<String>,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            function: None,
        }
    }

    /// Capture the caller's file and line
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// `file:line##function`, with the file reduced to its base name
    pub fn annotation(&self) -> String {
        let file = Path::new(&self.file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone());
        match self.function.as_deref() {
            Some(function) if !function.is_empty() => {
                format!("{}:{}##{}", file, self.line, function)
            }
            _ => format!("{}:{}", file, self.line),
        }
    }
}

/// A pre-formatting step applied to the message text
pub trait MessageHook: Send + Sync {
    fn apply(&self, message: &str, call_site: &CallSite) -> String;
}

/// Wraps the message as `==> LOG: {message} -- {file}:{line}##{function}`
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceAnnotation;

impl MessageHook for TraceAnnotation {
    fn apply(&self, message: &str, call_site: &CallSite) -> String {
        format!("==> LOG: {} -- {}", message, call_site.annotation())
    }
}
