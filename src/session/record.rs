//! History entries and the display-safe preview rule.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::classifier::Label;

const ELLIPSIS: &str = "...";
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// One classified message as stored in session history.
///
/// Fields are private so a record cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRecord {
    preview: String,
    label: Label,
    /// `HH:MM:SS`, local time.
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_duration_ms: Option<u64>,
}

impl ClassificationRecord {
    pub(crate) fn new(
        raw_message: &str,
        preview_len: usize,
        label: Label,
        classified_at: DateTime<Local>,
        analysis_duration_ms: Option<u64>,
    ) -> Self {
        Self {
            preview: preview(raw_message, preview_len),
            label,
            timestamp: format_timestamp(&classified_at),
            analysis_duration_ms,
        }
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn analysis_duration_ms(&self) -> Option<u64> {
        self.analysis_duration_ms
    }
}

/// Truncate `raw` to `max_chars` characters, appending `"..."` when anything
/// was cut.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn preview(raw: &str, max_chars: usize) -> String {
    match raw.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &raw[..cut]),
        None => raw.to_string(),
    }
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
