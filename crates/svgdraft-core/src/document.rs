//! Document-level properties: canvas size and view box.

use serde::{Deserialize, Serialize};

/// Document width used when neither attributes nor a view box provide one.
pub const DEFAULT_DOCUMENT_WIDTH: f64 = 960.0;
/// Document height used when neither attributes nor a view box provide one.
pub const DEFAULT_DOCUMENT_HEIGHT: f64 = 640.0;

/// A prefixed namespace declared on the source `<svg>` root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlNamespace {
    pub prefix: String,
    pub uri: String,
}

/// Size and coordinate window of an SVG document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub view_box: Option<String>,
    /// Declarations re-emitted on export so raw `defs` markup using these
    /// prefixes stays well-formed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<XmlNamespace>,
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_WIDTH, DEFAULT_DOCUMENT_HEIGHT)
    }
}

/// `"0 0 width height"`.
pub fn size_view_box(width: f64, height: f64) -> String {
    format!("0 0 {width} {height}")
}

impl SvgDocument {
    /// Create a document whose view box matches its size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            view_box: Some(size_view_box(width, height)),
            namespaces: Vec::new(),
        }
    }

    /// The stored view box, or `"0 0 width height"` when it is absent or blank.
    pub fn effective_view_box(&self) -> String {
        match self.view_box.as_deref() {
            Some(vb) if !vb.trim().is_empty() => vb.to_string(),
            _ => size_view_box(self.width, self.height),
        }
    }

    /// Check whether the view box just mirrors the document size.
    fn view_box_tracks_size(&self) -> bool {
        match self.view_box.as_deref() {
            None => true,
            Some(vb) => vb.trim().is_empty() || vb == size_view_box(self.width, self.height),
        }
    }

    /// Apply a patch. A view box that mirrored the old size follows the new
    /// size unless the patch sets one explicitly.
    pub fn apply_patch(&mut self, patch: &DocPatch) {
        let resized = patch.width.is_some() || patch.height.is_some();
        let follow = resized && patch.view_box.is_none() && self.view_box_tracks_size();

        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(view_box) = &patch.view_box {
            self.view_box = view_box.clone();
        } else if follow {
            self.view_box = Some(size_view_box(self.width, self.height));
        }
    }
}

/// A partial update to [`SvgDocument`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_view_box() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        assert_eq!(doc.effective_view_box(), "0 0 100 50");
        doc.view_box = Some("  ".to_string());
        assert_eq!(doc.effective_view_box(), "0 0 100 50");
        doc.view_box = Some("-5 -5 10 10".to_string());
        assert_eq!(doc.effective_view_box(), "-5 -5 10 10");
    }

    #[test]
    fn test_resize_follows_matching_view_box() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        doc.apply_patch(&DocPatch {
            width: Some(200.0),
            ..DocPatch::default()
        });
        assert_eq!(doc.view_box.as_deref(), Some("0 0 200 50"));
    }

    #[test]
    fn test_resize_keeps_custom_view_box() {
        let mut doc = SvgDocument {
            width: 100.0,
            height: 50.0,
            view_box: Some("0 0 10 5".to_string()),
            ..SvgDocument::default()
        };
        doc.apply_patch(&DocPatch {
            height: Some(80.0),
            ..DocPatch::default()
        });
        assert_eq!(doc.height, 80.0);
        assert_eq!(doc.view_box.as_deref(), Some("0 0 10 5"));
    }

    #[test]
    fn test_explicit_view_box_wins() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        doc.apply_patch(&DocPatch {
            width: Some(300.0),
            view_box: Some(Some("0 0 1 1".to_string())),
            ..DocPatch::default()
        });
        assert_eq!(doc.view_box.as_deref(), Some("0 0 1 1"));
    }
}
