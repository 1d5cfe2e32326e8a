//! Undo/redo snapshots and the list of committed versions.
//!
//! The two mechanisms are independent: browsing committed versions never
//! touches the undo stacks, and undo never touches the version list.

use crate::document::SvgDocument;
use crate::shapes::Element;
use serde::{Deserialize, Serialize};

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A deep copy of the editable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub doc: SvgDocument,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub defs: Option<String>,
}

impl EditorSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Linear undo/redo over whole-state snapshots.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    past: Vec<EditorSnapshot>,
    future: Vec<EditorSnapshot>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl UndoHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit,
        }
    }

    fn trim(stack: &mut Vec<EditorSnapshot>, limit: usize) {
        if stack.len() > limit {
            let excess = stack.len() - limit;
            stack.drain(..excess);
        }
    }

    /// Record a pre-image. Clears the redo stack and evicts the oldest
    /// entries beyond the limit.
    pub fn record(&mut self, snapshot: EditorSnapshot) {
        self.past.push(snapshot);
        self.future.clear();
        Self::trim(&mut self.past, self.limit);
    }

    /// Pop the latest pre-image, parking `current` for redo.
    pub fn undo(&mut self, current: EditorSnapshot) -> Option<EditorSnapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        let excess = self.future.len().saturating_sub(self.limit);
        self.future.drain(..excess);
        Some(previous)
    }

    /// Pop the latest undone state, parking `current` for undo.
    pub fn redo(&mut self, current: EditorSnapshot) -> Option<EditorSnapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Self::trim(&mut self.past, self.limit);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of states available to undo.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of states available to redo.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

/// A committed, browsable version of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Exported SVG text.
    pub svg: String,
    /// Thumbnail, when one could be produced.
    pub data_url: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Append-only list of committed versions.
#[derive(Debug, Clone, Default)]
pub struct VersionHistory {
    entries: Vec<HistoryEntry>,
    active: Option<usize>,
}

impl VersionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and make it active. Returns its index.
    pub fn push(&mut self, entry: HistoryEntry) -> usize {
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        self.active = Some(index);
        index
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Mark `index` as active. Returns false if it is out of range.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.active = None;
    }
}
