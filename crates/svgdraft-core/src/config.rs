//! Editor configuration.

use crate::document::SvgDocument;
use crate::history::MAX_UNDO_HISTORY;
use serde::{Deserialize, Serialize};

/// Offset applied to duplicated elements on both axes.
pub const DUPLICATE_OFFSET: f64 = 12.0;

/// Tunables for an [`SvgEditor`](crate::SvgEditor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo snapshots kept before the oldest is evicted.
    pub max_undo_history: usize,
    /// Offset applied to duplicates.
    pub duplicate_offset: f64,
    /// Document used for new and cleared editors.
    pub default_document: SvgDocument,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_history: MAX_UNDO_HISTORY,
            duplicate_offset: DUPLICATE_OFFSET,
            default_document: SvgDocument::default(),
        }
    }
}

impl EditorConfig {
    /// Load a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
