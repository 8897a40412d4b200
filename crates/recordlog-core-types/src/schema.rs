//! Canonical schema constants for record metadata and diagnostic events
//!
//! These constants keep the `extra` field group of every log line and the
//! facility's own tracing events consistent.

// Keys injected into a record's `extra` group by the enrichment steps
pub const EXTRA_UID: &str = "uid";
pub const EXTRA_PROCESS_ID: &str = "process_id";
pub const EXTRA_IP: &str = "ip";
pub const EXTRA_URL: &str = "url";
pub const EXTRA_HTTP_METHOD: &str = "http_method";
pub const EXTRA_LOG_SOURCE: &str = "log_source";

/// Constant value of the `log_source` marker field
pub const LOG_SOURCE: &str = "recordlog";

// Diagnostic event fields the test capture reads back by name
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_KEY: &str = "key";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
