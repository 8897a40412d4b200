//! Log record passed from the facade to a writer

use crate::level::Level;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Caller-supplied key/value pairs, rendered in the `content:` group
pub type Context = Map<String, Value>;

/// Enrichment metadata, rendered in the `extra:` group
pub type Extra = Map<String, Value>;

/// Turn a JSON value into a context map
///
/// Objects are used as-is, `null` is an empty context and any other value is
/// stored under the `value` key.
///
/// ```
/// use recordlog_core::record::context_from;
/// use serde_json::json;
///
/// let ctx = context_from(json!({"code": 500}));
/// assert_eq!(ctx.get("code"), Some(&json!(500)));
/// assert!(context_from(json!(null)).is_empty());
/// ```
pub fn context_from(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        Value::Null => Context::new(),
        other => {
            let mut map = Context::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// One record on its way to a file
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub datetime: NaiveDateTime,
    pub channel: String,
    pub level: Level,
    pub message: String,
    pub context: Context,
    pub extra: Extra,
}

impl Record {
    pub fn new(
        datetime: NaiveDateTime,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        context: Context,
    ) -> Self {
        Self {
            datetime,
            channel: channel.into(),
            level,
            message: message.into(),
            context,
            extra: Extra::new(),
        }
    }
}
