//! Rectangle element.

use super::{Element, ElementBase, ElementId, ShapeTrait};
use crate::svg::{MarkupWriter, number, optional_number};
use kurbo::{Point, Vec2};
use roxmltree::Node;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(flatten)]
    pub base: ElementBase,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
}

impl Rectangle {
    /// Create a new rectangle with no id.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            base: ElementBase::default(),
            x,
            y,
            width,
            height,
            rx: None,
            ry: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.base.id = id.into();
        self
    }
}

impl ShapeTrait for Rectangle {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn position(&self) -> Option<Point> {
        Some(Point::new(self.x, self.y))
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    fn write_svg(&self, out: &mut MarkupWriter) {
        out.start("rect", &self.base.id);
        out.attr("x", self.x);
        out.attr("y", self.y);
        out.attr("width", self.width);
        out.attr("height", self.height);
        out.attr_opt("rx", self.rx);
        out.attr_opt("ry", self.ry);
        out.common(&self.base);
        out.end_empty();
    }
}

pub(crate) fn parse_rect(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    Some(Element::Rect(Rectangle {
        base,
        x: number(node, "x"),
        y: number(node, "y"),
        width: number(node, "width"),
        height: number(node, "height"),
        rx: optional_number(node, "rx"),
        ry: optional_number(node, "ry"),
    }))
}
