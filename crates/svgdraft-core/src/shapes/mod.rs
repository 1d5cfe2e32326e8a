//! Element definitions for the editable SVG model.

mod ellipse;
mod line;
mod patch;
mod path;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use line::Line;
pub use patch::ElementPatch;
pub use path::Path;
pub use rectangle::Rectangle;
pub use text::{Text, TextAnchor};

pub(crate) use ellipse::{parse_circle, parse_ellipse};
pub(crate) use line::parse_line;
pub(crate) use path::{parse_path, parse_polygon, parse_polyline};
pub(crate) use rectangle::parse_rect;
pub(crate) use text::parse_text;

use crate::svg::MarkupWriter;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an element, unique within a document.
pub type ElementId = String;

/// Generate a fresh element id.
pub fn new_element_id() -> ElementId {
    Uuid::new_v4().to_string()
}

/// Translate/scale/rotate components of an element.
///
/// Components that were never set stay `None`; identity defaults are only
/// applied when the transform is written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Transform {
    /// A transform carrying only a translation.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Check if no component is set.
    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.scale_x.is_none()
            && self.scale_y.is_none()
            && self.rotation.is_none()
    }

    /// Translation offset, with unset components read as zero.
    pub fn offset(&self) -> Point {
        Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }
}

/// Paint attributes shared by every element type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

fn default_visible() -> bool {
    true
}

/// Fields every element carries regardless of its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    /// Element id. Empty until the element is added to an editor.
    #[serde(default)]
    pub id: ElementId,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub style: ElementStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl Default for ElementBase {
    fn default() -> Self {
        Self {
            id: ElementId::new(),
            visible: true,
            locked: false,
            style: ElementStyle::default(),
            transform: None,
        }
    }
}

impl ElementBase {
    /// Base with the given id and default everything else.
    pub fn with_id(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Common behaviour of all element types.
pub trait ShapeTrait {
    /// Shared fields.
    fn base(&self) -> &ElementBase;

    /// Mutable shared fields.
    fn base_mut(&mut self) -> &mut ElementBase;

    /// The point connectors follow, if this type has one.
    fn position(&self) -> Option<Point>;

    /// Shift the element by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Write this element as one SVG fragment.
    fn write_svg(&self, out: &mut MarkupWriter);
}

/// Enum wrapper for all element types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    #[serde(rename = "rect")]
    Rect(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Path(Path),
    Text(Text),
}

impl Element {
    fn as_shape(&self) -> &dyn ShapeTrait {
        match self {
            Element::Rect(s) => s,
            Element::Ellipse(s) => s,
            Element::Line(s) => s,
            Element::Path(s) => s,
            Element::Text(s) => s,
        }
    }

    fn as_shape_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Element::Rect(s) => s,
            Element::Ellipse(s) => s,
            Element::Line(s) => s,
            Element::Path(s) => s,
            Element::Text(s) => s,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn base(&self) -> &ElementBase {
        self.as_shape().base()
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        self.as_shape_mut().base_mut()
    }

    /// Type discriminator as used in the serialized model.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Rect(_) => "rect",
            Element::Ellipse(_) => "ellipse",
            Element::Line(_) => "line",
            Element::Path(_) => "path",
            Element::Text(_) => "text",
        }
    }

    /// Position used for connector following. Lines have none.
    pub fn position(&self) -> Option<Point> {
        self.as_shape().position()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.as_shape_mut().translate(delta);
    }

    pub fn is_visible(&self) -> bool {
        self.base().visible
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Element::Line(line) => Some(line),
            _ => None,
        }
    }

    pub(crate) fn write_svg(&self, out: &mut MarkupWriter) {
        self.as_shape().write_svg(out);
    }
}

impl From<Rectangle> for Element {
    fn from(shape: Rectangle) -> Self {
        Element::Rect(shape)
    }
}

impl From<Ellipse> for Element {
    fn from(shape: Ellipse) -> Self {
        Element::Ellipse(shape)
    }
}

impl From<Line> for Element {
    fn from(shape: Line) -> Self {
        Element::Line(shape)
    }
}

impl From<Path> for Element {
    fn from(shape: Path) -> Self {
        Element::Path(shape)
    }
}

impl From<Text> for Element {
    fn from(shape: Text) -> Self {
        Element::Text(shape)
    }
}

/// Shift the bound endpoints of every line that references `target`.
///
/// Start and end references are matched independently. The element whose id
/// is `target` itself is left alone.
pub fn follow_connectors(elements: &mut [Element], target: &str, delta: Vec2) {
    for element in elements.iter_mut() {
        if let Element::Line(line) = element {
            if line.base.id != target {
                line.follow(target, delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_json_shape() {
        let rect = Rectangle::new(1.0, 2.0, 3.0, 4.0).with_id("a");
        let json = serde_json::to_value(Element::from(rect)).unwrap();
        assert_eq!(json["type"], "rect");
        assert_eq!(json["id"], "a");
        assert_eq!(json["visible"], true);
        assert_eq!(json["locked"], false);
        assert!(json.get("fill").is_none());
    }

    #[test]
    fn test_element_json_defaults() {
        let element: Element =
            serde_json::from_str(r#"{"type":"ellipse","cx":5,"cy":6,"rx":1,"ry":2,"strokeWidth":3}"#)
                .unwrap();
        assert!(element.is_visible());
        assert!(!element.base().locked);
        assert_eq!(element.base().style.stroke_width, Some(3.0));
        assert_eq!(element.position(), Some(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_follow_connectors_matches_ends_independently() {
        let mut elements = vec![
            Element::from(Line::new(0.0, 0.0, 50.0, 50.0).with_id("l1").with_refs(Some("a"), None)),
            Element::from(Line::new(0.0, 0.0, 50.0, 50.0).with_id("l2").with_refs(None, Some("a"))),
            Element::from(Line::new(0.0, 0.0, 50.0, 50.0).with_id("l3").with_refs(Some("b"), Some("b"))),
        ];
        follow_connectors(&mut elements, "a", Vec2::new(5.0, 7.0));

        let l1 = elements[0].as_line().unwrap();
        assert_eq!((l1.x1, l1.y1, l1.x2, l1.y2), (5.0, 7.0, 50.0, 50.0));
        let l2 = elements[1].as_line().unwrap();
        assert_eq!((l2.x1, l2.y1, l2.x2, l2.y2), (0.0, 0.0, 55.0, 57.0));
        let l3 = elements[2].as_line().unwrap();
        assert_eq!((l3.x1, l3.y1, l3.x2, l3.y2), (0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_path_position_reads_transform() {
        let mut path = Path::new("M0 0 L10 10");
        assert_eq!(Element::from(path.clone()).position(), Some(Point::ZERO));
        path.base.transform = Some(Transform::translate(3.0, 4.0));
        assert_eq!(Element::from(path).position(), Some(Point::new(3.0, 4.0)));
    }
}
