//! Editor settings boundary.
//!
//! Settings are owned and persisted by the host (settings dialog / layout files); the
//! kernel consumes them read-only. The struct deserializes from the host's JSON with
//! per-field defaults, so a partial settings file never fails to load.

use serde::{Deserialize, Serialize};

/// Configuration values the smart-edit engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Indent width in spaces.
    pub tab_size: usize,
    /// Whether typing an opener inserts the matching closer.
    pub auto_close_brackets: bool,
    /// Whether newline copies and extends the previous indentation.
    pub auto_indent: bool,
    /// Auto-save interval in milliseconds. The kernel only exposes this value; the
    /// host's timer drives actual saving.
    pub auto_save_interval_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            auto_close_brackets: true,
            auto_indent: true,
            auto_save_interval_ms: 30_000,
        }
    }
}

impl EditorSettings {
    /// Parse settings from the host's persisted JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// One indentation level as a string of spaces.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.tab_size.max(1))
    }
}
