//! Note Record - free-text notes keyed by time

use serde::{Deserialize, Serialize};

/// A single experimenter note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteRecord {
    time: String,
    text: String,
}

impl NoteRecord {
    /// Create a note record.
    #[must_use]
    pub fn new(time: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            text: text.into(),
        }
    }

    /// Timestamp key (`HH:MM:SS.ffffff`).
    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Note text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
