//! Path element. Polylines and polygons are folded into paths when parsed.

use super::{Element, ElementBase, ElementId, ShapeTrait, Transform};
use crate::svg::{MarkupWriter, attr, parse_float_prefix};
use kurbo::{Point, Vec2};
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A free-form path. Its position lives in the transform translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    #[serde(flatten)]
    pub base: ElementBase,
    /// Path data.
    pub d: String,
}

impl Path {
    /// Create a new path with no id.
    pub fn new(d: impl Into<String>) -> Self {
        Self {
            base: ElementBase::default(),
            d: d.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.base.id = id.into();
        self
    }
}

impl ShapeTrait for Path {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn position(&self) -> Option<Point> {
        Some(
            self.base
                .transform
                .as_ref()
                .map(Transform::offset)
                .unwrap_or(Point::ZERO),
        )
    }

    fn translate(&mut self, delta: Vec2) {
        let transform = self.base.transform.get_or_insert_with(Transform::default);
        transform.x = Some(transform.x.unwrap_or(0.0) + delta.x);
        transform.y = Some(transform.y.unwrap_or(0.0) + delta.y);
    }

    fn write_svg(&self, out: &mut MarkupWriter) {
        out.start("path", &self.base.id);
        out.attr("d", &self.d);
        out.common(&self.base);
        out.end_empty();
    }
}

/// Build `M`/`L` path data from a `points` attribute, closing with `Z` when asked.
pub(crate) fn points_to_path_data(points: &str, close: bool) -> String {
    let coords: Vec<Option<f64>> = points
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float_prefix)
        .collect();

    let mut d = String::new();
    for pair in coords.chunks(2) {
        if let [Some(x), Some(y)] = pair {
            let command = if d.is_empty() { 'M' } else { 'L' };
            let _ = write!(d, "{command}{x} {y} ");
        }
    }
    if close {
        d.push('Z');
    }
    d.trim().to_string()
}

pub(crate) fn parse_path(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    Some(Element::Path(Path {
        base,
        d: attr(node, "d").unwrap_or_default().to_string(),
    }))
}

fn parse_points(node: Node<'_, '_>, mut base: ElementBase, close: bool) -> Option<Element> {
    let points = attr(node, "points")?;
    base.style.fill.get_or_insert_with(|| "none".to_string());
    Some(Element::Path(Path {
        base,
        d: points_to_path_data(points, close),
    }))
}

pub(crate) fn parse_polyline(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    parse_points(node, base, false)
}

pub(crate) fn parse_polygon(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    parse_points(node, base, true)
}
