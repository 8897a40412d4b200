//! Correlation types for tying log records together
//!
//! A `RunId` identifies one facade instance (one "run" of the host), so every
//! line written during that run can be grouped. `RequestInfo` carries the
//! ambient request metadata stamped into each record when the host is
//! serving a request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single run of the logging facade
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new random RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ambient request metadata
///
/// All fields are empty strings when the host is not serving a request
/// (batch jobs, CLI tools, background workers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Client address
    pub ip: String,
    /// Requested URL
    pub url: String,
    /// HTTP method
    pub method: String,
}

impl RequestInfo {
    /// Create request info for a live request
    pub fn new(ip: impl Into<String>, url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            url: url.into(),
            method: method.into(),
        }
    }

    /// Request info used outside of any request context
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no request metadata is present
    pub fn is_empty(&self) -> bool {
        self.ip.is_empty() && self.url.is_empty() && self.method.is_empty()
    }
}
