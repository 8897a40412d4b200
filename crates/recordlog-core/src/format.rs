//! Fixed line layout
//!
//! ```text
//! {datetime}###{channel}###{levelName}###{message}###content:{context}###extra:{extra}\n
//! ```
//!
//! `context` and `extra` are inline JSON objects, or empty when the map is
//! empty. Line breaks inside the message become spaces so a record always
//! occupies exactly one line.

use crate::errors::Result;
use crate::record::Record;
use serde_json::{Map, Value};

/// `strftime` pattern for the `datetime` field
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field separator
pub const SEPARATOR: &str = "###";

/// Renders records into the fixed line layout
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormatter;

impl LineFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render one record, including the trailing newline
    ///
    /// # Errors
    ///
    /// Returns `RecordLogError::Format` if a context or extra value cannot
    /// be serialized.
    pub fn format(&self, record: &Record) -> Result<String> {
        let context = render_group(&record.context)?;
        let extra = render_group(&record.extra)?;
        Ok(format!(
            "{datetime}{sep}{channel}{sep}{level}{sep}{message}{sep}content:{context}{sep}extra:{extra}\n",
            datetime = record.datetime.format(DATETIME_FORMAT),
            channel = record.channel,
            level = record.level.name(),
            message = single_line(&record.message),
            sep = SEPARATOR,
        ))
    }
}

fn render_group(map: &Map<String, Value>) -> Result<String> {
    if map.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_json::to_string(map)?)
}

fn single_line(message: &str) -> String {
    message.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Parsed view of one line, used by tests and by hosts tailing the files
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub datetime: String,
    pub channel: String,
    pub level: String,
    pub message: String,
    pub context: Map<String, Value>,
    pub extra: Map<String, Value>,
}

/// Split a formatted line back into its fields
///
/// Returns `None` when the line does not follow the layout.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut parts = line.splitn(4, SEPARATOR);
    let datetime = parts.next()?.to_string();
    let channel = parts.next()?.to_string();
    let level = parts.next()?.to_string();
    let rest = parts.next()?;

    // The message may itself contain the separator, so split from the right.
    let (rest, extra) = rest.rsplit_once(&format!("{SEPARATOR}extra:"))?;
    let (message, context) = rest.rsplit_once(&format!("{SEPARATOR}content:"))?;

    Some(ParsedLine {
        datetime,
        channel,
        level,
        message: message.to_string(),
        context: parse_group(context)?,
        extra: parse_group(extra)?,
    })
}

fn parse_group(text: &str) -> Option<Map<String, Value>> {
    if text.is_empty() {
        return Some(Map::new());
    }
    serde_json::from_str(text).ok()
}
