//! Ellipse element. Parsed circles become ellipses with equal radii.

use super::{Element, ElementBase, ElementId, ShapeTrait};
use crate::svg::{MarkupWriter, number};
use kurbo::{Point, Vec2};
use roxmltree::Node;
use serde::{Deserialize, Serialize};

/// An ellipse defined by its center and radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    #[serde(flatten)]
    pub base: ElementBase,
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    /// Create a new ellipse with no id.
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self {
            base: ElementBase::default(),
            cx,
            cy,
            rx,
            ry,
        }
    }

    /// Create a circle.
    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(cx, cy, r, r)
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.base.id = id.into();
        self
    }
}

impl ShapeTrait for Ellipse {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn position(&self) -> Option<Point> {
        Some(Point::new(self.cx, self.cy))
    }

    fn translate(&mut self, delta: Vec2) {
        self.cx += delta.x;
        self.cy += delta.y;
    }

    fn write_svg(&self, out: &mut MarkupWriter) {
        out.start("ellipse", &self.base.id);
        out.attr("cx", self.cx);
        out.attr("cy", self.cy);
        out.attr("rx", self.rx);
        out.attr("ry", self.ry);
        out.common(&self.base);
        out.end_empty();
    }
}

pub(crate) fn parse_ellipse(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    Some(Element::Ellipse(Ellipse {
        base,
        cx: number(node, "cx"),
        cy: number(node, "cy"),
        rx: number(node, "rx"),
        ry: number(node, "ry"),
    }))
}

pub(crate) fn parse_circle(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    let r = number(node, "r");
    Some(Element::Ellipse(Ellipse {
        base,
        cx: number(node, "cx"),
        cy: number(node, "cy"),
        rx: r,
        ry: r,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_moves_center() {
        let mut ellipse = Ellipse::circle(10.0, 10.0, 4.0);
        ellipse.translate(Vec2::new(12.0, 12.0));
        assert_eq!((ellipse.cx, ellipse.cy), (22.0, 22.0));
        assert_eq!((ellipse.rx, ellipse.ry), (4.0, 4.0));
    }
}
