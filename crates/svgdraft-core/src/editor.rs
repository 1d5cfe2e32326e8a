//! Editor state and the editing API.

use crate::config::EditorConfig;
use crate::document::{DocPatch, SvgDocument};
use crate::history::{EditorSnapshot, HistoryEntry, UndoHistory, VersionHistory};
use crate::selection::Selection;
use crate::shapes::{Element, ElementId, ElementPatch, follow_connectors, new_element_id};
use crate::svg::{build_svg_markup, svg_to_data_url, try_parse_svg};
use kurbo::Vec2;
use std::collections::HashSet;
use std::fmt;
use web_time::{SystemTime, UNIX_EPOCH};

/// Produces a thumbnail (usually a data URL) for exported SVG text.
pub type Thumbnailer = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Options for a single edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOptions {
    /// Snapshot the pre-image for undo.
    pub record: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self { record: true }
    }
}

impl EditOptions {
    /// Apply without recording, e.g. for intermediate steps of a drag that
    /// was committed with [`SvgEditor::commit_snapshot`].
    pub fn silent() -> Self {
        Self { record: false }
    }
}

/// Options for [`SvgEditor::load_svg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Append the loaded document to the version history.
    pub save_history: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { save_history: true }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// An SVG document being edited, with its selection and history.
pub struct SvgEditor {
    config: EditorConfig,
    doc: SvgDocument,
    elements: Vec<Element>,
    defs: Option<String>,
    selection: Selection,
    undo: UndoHistory,
    versions: VersionHistory,
    thumbnailer: Thumbnailer,
}

impl fmt::Debug for SvgEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgEditor")
            .field("doc", &self.doc)
            .field("elements", &self.elements.len())
            .field("selection", &self.selection)
            .field("undo_depth", &self.undo.undo_depth())
            .field("redo_depth", &self.undo.redo_depth())
            .field("versions", &self.versions.len())
            .finish_non_exhaustive()
    }
}

impl Default for SvgEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgEditor {
    /// Create an empty editor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            doc: config.default_document.clone(),
            elements: Vec::new(),
            defs: None,
            selection: Selection::new(),
            undo: UndoHistory::new(config.max_undo_history),
            versions: VersionHistory::new(),
            thumbnailer: Box::new(svg_to_data_url),
            config,
        }
    }

    /// Replace the thumbnail function used by [`add_history`](Self::add_history).
    pub fn with_thumbnailer<F>(mut self, thumbnailer: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.thumbnailer = Box::new(thumbnailer);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn doc(&self) -> &SvgDocument {
        &self.doc
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == id)
    }

    pub fn defs(&self) -> Option<&str> {
        self.defs.as_deref()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| el.id() == id)
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select exactly `id`. Returns false if no such element exists.
    pub fn select(&mut self, id: &str) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.selection.select_only(id);
        true
    }

    /// Replace the selection, ignoring ids with no element.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let existing: Vec<ElementId> = ids
            .into_iter()
            .filter(|id| self.index_of(id.as_ref()).is_some())
            .map(|id| id.as_ref().to_string())
            .collect();
        self.selection.replace(existing);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    // --- Undo/redo ---

    /// Take a deep copy of the editable state.
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            doc: self.doc.clone(),
            elements: self.elements.clone(),
            defs: self.defs.clone(),
        }
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.doc = snapshot.doc;
        self.elements = snapshot.elements;
        self.defs = snapshot.defs;
        self.selection.clear();
    }

    /// Push current state to the undo stack (call before making changes).
    pub fn push_history_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.undo.record(snapshot);
    }

    /// Record the current state once, ahead of a series of silent edits.
    pub fn commit_snapshot(&mut self) {
        self.push_history_snapshot();
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.undo.can_undo() {
            return false;
        }
        let current = self.snapshot();
        match self.undo.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.undo.can_redo() {
            return false;
        }
        let current = self.snapshot();
        match self.undo.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    // --- Document ---

    /// Change the document size or view box.
    pub fn update_doc(&mut self, patch: DocPatch) {
        self.push_history_snapshot();
        self.doc.apply_patch(&patch);
    }

    // --- Elements ---

    fn claim_id(&self, requested: &str) -> ElementId {
        if requested.is_empty() {
            return new_element_id();
        }
        if self.index_of(requested).is_some() {
            let fresh = new_element_id();
            log::warn!("Element id {:?} already in use, assigned {}", requested, fresh);
            return fresh;
        }
        requested.to_string()
    }

    /// Append an element and select it. Returns its id.
    ///
    /// Elements without an id, or whose id is taken, get a fresh one.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        self.push_history_snapshot();
        let id = self.claim_id(element.id());
        element.base_mut().id = id.clone();
        self.elements.push(element);
        self.selection.select_only(id.clone());
        id
    }

    /// Apply a partial update to one element.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch, options: EditOptions) -> bool {
        self.update_element_with(id, |element| patch.apply(element), options)
    }

    /// Update one element in place.
    ///
    /// If the element's position changes, lines bound to it follow by the
    /// same delta. The element keeps its id. Returns false if `id` is unknown.
    pub fn update_element_with<F>(&mut self, id: &str, update: F, options: EditOptions) -> bool
    where
        F: FnOnce(&mut Element),
    {
        let Some(index) = self.index_of(id) else {
            log::debug!("update_element: no element {:?}", id);
            return false;
        };
        if options.record {
            self.push_history_snapshot();
        }

        let element = &mut self.elements[index];
        let before = element.position();
        update(element);
        if element.id() != id {
            log::warn!("Element ids cannot be changed by an update, keeping {:?}", id);
            element.base_mut().id = id.to_string();
        }
        let after = element.position();

        if let (Some(before), Some(after)) = (before, after) {
            let delta = after - before;
            if delta != Vec2::ZERO {
                follow_connectors(&mut self.elements, id, delta);
            }
        }
        true
    }

    /// Translate one element and the bound endpoints of lines referencing it.
    pub fn move_element(&mut self, id: &str, dx: f64, dy: f64, options: EditOptions) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("move_element: no element {:?}", id);
            return false;
        };
        if options.record {
            self.push_history_snapshot();
        }
        let delta = Vec2::new(dx, dy);
        self.elements[index].translate(delta);
        follow_connectors(&mut self.elements, id, delta);
        true
    }

    /// Remove one element. Lines referencing it keep their dangling reference.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        let index = self.index_of(id)?;
        self.push_history_snapshot();
        let removed = self.elements.remove(index);
        self.selection.remove(id);
        Some(removed)
    }

    /// Remove every listed element. Returns how many were removed.
    pub fn remove_many<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        if !self.elements.iter().any(|el| targets.contains(el.id())) {
            return 0;
        }
        self.push_history_snapshot();
        let before = self.elements.len();
        self.elements.retain(|el| !targets.contains(el.id()));
        for id in &targets {
            self.selection.remove(id);
        }
        before - self.elements.len()
    }

    fn insert_duplicate(&mut self, mut clone: Element) -> ElementId {
        let id = new_element_id();
        clone.base_mut().id = id.clone();
        let offset = self.config.duplicate_offset;
        clone.translate(Vec2::new(offset, offset));
        self.elements.push(clone);
        id
    }

    /// Clone an element at an offset and select the clone.
    pub fn duplicate_element(&mut self, id: &str) -> Option<ElementId> {
        let original = self.element(id)?.clone();
        self.push_history_snapshot();
        let new_id = self.insert_duplicate(original);
        self.selection.select_only(new_id.clone());
        Some(new_id)
    }

    /// Clone every listed element at an offset and select the clones.
    pub fn duplicate_many<I, S>(&mut self, ids: I) -> Vec<ElementId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let originals: Vec<Element> = ids
            .into_iter()
            .filter_map(|id| self.element(id.as_ref()).cloned())
            .collect();
        if originals.is_empty() {
            return Vec::new();
        }
        self.push_history_snapshot();
        let created: Vec<ElementId> = originals
            .into_iter()
            .map(|element| self.insert_duplicate(element))
            .collect();
        self.selection.replace(created.iter().cloned());
        created
    }

    // --- SVG in/out ---

    /// Replace the document with parsed SVG text or data URL.
    ///
    /// Unparsable input is logged and leaves the editor untouched.
    pub fn load_svg(&mut self, svg: &str, options: LoadOptions) -> bool {
        let parsed = match try_parse_svg(svg) {
            Ok(parsed) => parsed,
            Err(e) => {
                let preview: String = svg.trim().chars().take(120).collect();
                log::warn!("Ignoring SVG load ({}): {}", e, preview);
                return false;
            }
        };

        self.push_history_snapshot();
        self.doc = parsed.doc;
        self.elements = parsed.elements;
        self.defs = parsed.defs;
        self.selection.clear();
        log::info!("Loaded SVG with {} elements", self.elements.len());

        if options.save_history {
            let markup = self.export_svg();
            self.add_history(markup);
        }
        true
    }

    /// Serialize the current document.
    pub fn export_svg(&self) -> String {
        build_svg_markup(&self.doc, &self.elements, self.defs.as_deref())
    }

    /// Reset to an empty default document, dropping all history.
    pub fn clear(&mut self) {
        self.doc = self.config.default_document.clone();
        self.elements.clear();
        self.defs = None;
        self.selection.clear();
        self.undo.clear();
        self.versions.clear();
    }

    // --- Versions ---

    /// Committed versions, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        self.versions.entries()
    }

    pub fn active_history_index(&self) -> Option<usize> {
        self.versions.active()
    }

    /// Commit `svg` as a new version and make it active. Returns its index.
    pub fn add_history(&mut self, svg: impl Into<String>) -> usize {
        let svg = svg.into();
        let data_url = (self.thumbnailer)(&svg);
        if data_url.is_none() {
            log::debug!("No thumbnail produced for history entry");
        }
        self.versions.push(HistoryEntry {
            svg,
            data_url,
            timestamp: now_millis(),
        })
    }

    /// Replace the document with a committed version.
    ///
    /// The undo/redo stacks are left as they are.
    pub fn restore_history_at(&mut self, index: usize) -> bool {
        let Some(entry) = self.versions.get(index) else {
            log::warn!("No history entry at index {}", index);
            return false;
        };
        let parsed = match try_parse_svg(&entry.svg) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Failed to restore history entry {}: {}", index, e);
                return false;
            }
        };
        self.doc = parsed.doc;
        self.elements = parsed.elements;
        self.defs = parsed.defs;
        self.selection.clear();
        self.versions.set_active(index);
        true
    }
}
