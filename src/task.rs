// Task record model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label every task carries when it is created
pub const DEFAULT_DAY: &str = "Today";

/// A single to-do item
///
/// Field names are part of the stored JSON format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_day")]
    pub day: String,
    /// Rendering identity, always equal to `id`
    #[serde(default)]
    pub key: String,
}

fn default_day() -> String {
    DEFAULT_DAY.to_string()
}

impl Task {
    /// Create an open task stamped with the current local date
    pub fn new(text: impl Into<String>) -> Self {
        Self::created_at(text, Local::now())
    }

    /// Create an open task stamped with the given creation time
    pub fn created_at(text: impl Into<String>, at: DateTime<Local>) -> Self {
        let id = new_id();
        Self {
            key: id.clone(),
            id,
            text: text.into(),
            completed: false,
            date: format_date(at),
            day: default_day(),
        }
    }

    /// Fill in a rendering key for records stored without one
    pub(crate) fn normalize(mut self) -> Self {
        if self.key.is_empty() {
            self.key = self.id.clone();
        }
        self
    }
}

/// Time-ordered unique identifier (UUIDv7: millisecond timestamp + random bits)
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current timestamp in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}

/// Day/month/year, the way en-GB locales print a short date
pub fn format_date(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y").to_string()
}
