use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a product's append-only audit trail.
///
/// Events are created by whichever operation mutates the product and are
/// never edited or removed; a product's removal keeps its trail intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEvent {
    pub fn new(description: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        HistoryEvent {
            description: description.into(),
            timestamp,
        }
    }

    /// Packed single-string form consumed by existing dashboards:
    /// `"{description} (Timestamp: {unix_seconds})"`. Output-only; nothing
    /// in the core parses this back.
    pub fn packed(&self) -> String {
        format!("{} (Timestamp: {})", self.description, self.timestamp.timestamp())
    }
}
