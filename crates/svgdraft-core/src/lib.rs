//! SvgDraft Core Library
//!
//! In-memory SVG document editing: parse markup into typed elements, edit
//! them with connector-aware moves, undo/redo, and export back to SVG.

pub mod config;
pub mod document;
pub mod editor;
pub mod history;
pub mod selection;
pub mod shapes;
pub mod svg;

pub use config::{DUPLICATE_OFFSET, EditorConfig};
pub use document::{
    DEFAULT_DOCUMENT_HEIGHT, DEFAULT_DOCUMENT_WIDTH, DocPatch, SvgDocument, XmlNamespace,
};
pub use editor::{EditOptions, LoadOptions, SvgEditor, Thumbnailer};
pub use history::{EditorSnapshot, HistoryEntry, MAX_UNDO_HISTORY, UndoHistory, VersionHistory};
pub use selection::Selection;
pub use shapes::{
    Element, ElementBase, ElementId, ElementPatch, ElementStyle, Ellipse, Line, Path, Rectangle,
    ShapeTrait, Text, TextAnchor, Transform,
};
pub use svg::{
    ParsedSvg, SvgError, SvgResult, build_svg_markup, decode_svg_content, parse_svg,
    svg_to_data_url, try_parse_svg,
};
