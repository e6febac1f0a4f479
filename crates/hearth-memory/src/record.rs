//! Memory record model used by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted conversation record.
///
/// The on-disk field name for the timestamp is `datetime`, one JSON object
/// per line in the memory file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Moment the message was produced.
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,
    /// Display name of whoever produced the message.
    pub author: String,
    /// Message content.
    pub message: String,
}

impl MemoryRecord {
    /// Create a record from its parts.
    pub fn new(
        timestamp: DateTime<Utc>,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            message: message.into(),
        }
    }

    /// Render the record as a recall line: `[DD.MM.YYYY HH:MM] <author> said <message>`.
    pub fn render(&self) -> String {
        format!(
            "[{}] {} said {}",
            self.timestamp.format("%d.%m.%Y %H:%M"),
            self.author,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRecord;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn render_formats_timestamp_author_and_message() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 42).unwrap();
        let record = MemoryRecord::new(timestamp, "Alice", "hi there");
        assert_eq!(record.render(), "[09.03.2024 17:05] Alice said hi there");
    }

    #[test]
    fn serializes_timestamp_under_datetime_key() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = MemoryRecord::new(timestamp, "Bot", "hello");
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("datetime").is_some());
        assert!(json.get("timestamp").is_none());
    }
}
