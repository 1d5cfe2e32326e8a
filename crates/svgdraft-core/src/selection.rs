//! Selected element ids.

use crate::shapes::ElementId;

/// Ordered set of selected ids.
///
/// The selection only names elements; it does not own them. Callers drop ids
/// when the matching elements are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with exactly `id`.
    pub fn select_only(&mut self, id: impl Into<ElementId>) {
        self.ids.clear();
        self.ids.push(id.into());
    }

    /// Replace the selection with `ids`, dropping repeats.
    pub fn replace<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn add(&mut self, id: impl Into<ElementId>) {
        let id = id.into();
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Remove `id`. Returns true if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// The selected id when exactly one element is selected.
    pub fn single(&self) -> Option<&str> {
        match self.ids.as_slice() {
            [id] => Some(id),
            _ => None,
        }
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_only_replaces() {
        let mut selection = Selection::new();
        selection.replace(["a", "b", "a"]);
        assert_eq!(selection.ids(), ["a", "b"]);
        assert_eq!(selection.single(), None);

        selection.select_only("c");
        assert_eq!(selection.single(), Some("c"));
    }

    #[test]
    fn test_remove() {
        let mut selection = Selection::new();
        selection.replace(["a", "b"]);
        assert!(selection.remove("a"));
        assert!(!selection.remove("a"));
        assert!(!selection.contains("a"));
        assert!(selection.contains("b"));
        assert_eq!(selection.len(), 1);
    }
}
