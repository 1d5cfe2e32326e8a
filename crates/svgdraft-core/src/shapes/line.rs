//! Line element, optionally bound to other elements as a connector.

use super::{Element, ElementBase, ElementId, ShapeTrait};
use crate::svg::{MarkupWriter, attr, number};
use kurbo::{Point, Vec2};
use roxmltree::Node;
use serde::{Deserialize, Serialize};

/// A straight line segment.
///
/// `start_ref`/`end_ref` name the elements whose movement the matching
/// endpoint follows. They do not own the target and may dangle after the
/// target is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(flatten)]
    pub base: ElementBase,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ref: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ref: Option<ElementId>,
}

impl Line {
    /// Create a new unbound line with no id.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            base: ElementBase::default(),
            x1,
            y1,
            x2,
            y2,
            start_ref: None,
            end_ref: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.base.id = id.into();
        self
    }

    /// Bind the endpoints to other elements.
    pub fn with_refs(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_ref = start.map(str::to_string);
        self.end_ref = end.map(str::to_string);
        self
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Apply `delta` to each endpoint bound to `target`.
    /// Returns true if either endpoint moved.
    pub fn follow(&mut self, target: &str, delta: Vec2) -> bool {
        let mut moved = false;
        if self.start_ref.as_deref() == Some(target) {
            self.x1 += delta.x;
            self.y1 += delta.y;
            moved = true;
        }
        if self.end_ref.as_deref() == Some(target) {
            self.x2 += delta.x;
            self.y2 += delta.y;
            moved = true;
        }
        moved
    }
}

impl ShapeTrait for Line {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn position(&self) -> Option<Point> {
        None
    }

    fn translate(&mut self, delta: Vec2) {
        self.x1 += delta.x;
        self.y1 += delta.y;
        self.x2 += delta.x;
        self.y2 += delta.y;
    }

    fn write_svg(&self, out: &mut MarkupWriter) {
        out.start("line", &self.base.id);
        out.attr("x1", self.x1);
        out.attr("y1", self.y1);
        out.attr("x2", self.x2);
        out.attr("y2", self.y2);
        out.attr_opt("data-start-ref", self.start_ref.as_deref());
        out.attr_opt("data-end-ref", self.end_ref.as_deref());
        out.common(&self.base);
        out.end_empty();
    }
}

pub(crate) fn parse_line(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    Some(Element::Line(Line {
        base,
        x1: number(node, "x1"),
        y1: number(node, "y1"),
        x2: number(node, "x2"),
        y2: number(node, "y2"),
        start_ref: attr(node, "data-start-ref").map(str::to_string),
        end_ref: attr(node, "data-end-ref").map(str::to_string),
    }))
}
