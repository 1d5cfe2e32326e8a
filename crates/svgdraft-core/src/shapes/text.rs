//! Text element.

use super::{Element, ElementBase, ElementId, ShapeTrait};
use crate::svg::{MarkupWriter, attr, number, optional_number};
use kurbo::{Point, Vec2};
use roxmltree::Node;
use serde::{Deserialize, Serialize};

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
    Inherit,
}

impl TextAnchor {
    /// Parse an SVG `text-anchor` value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "start" => Some(TextAnchor::Start),
            "middle" => Some(TextAnchor::Middle),
            "end" => Some(TextAnchor::End),
            "inherit" => Some(TextAnchor::Inherit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
            TextAnchor::Inherit => "inherit",
        }
    }
}

/// A single text run anchored at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(flatten)]
    pub base: ElementBase,
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_anchor: Option<TextAnchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_baseline: Option<String>,
}

impl Text {
    /// Create a new text element with no id.
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            base: ElementBase::default(),
            x,
            y,
            text: text.into(),
            font_size: None,
            font_weight: None,
            text_anchor: None,
            dominant_baseline: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.base.id = id.into();
        self
    }
}

impl ShapeTrait for Text {
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
        out.start("text", &self.base.id);
        out.attr("x", self.x);
        out.attr("y", self.y);
        out.attr_opt("font-size", self.font_size);
        out.attr_opt("font-weight", self.font_weight.as_deref());
        out.attr_opt("text-anchor", self.text_anchor.map(|a| a.as_str()));
        out.attr_opt("dominant-baseline", self.dominant_baseline.as_deref());
        out.common(&self.base);
        out.end_with_text("text", &self.text);
    }
}

pub(crate) fn parse_text(node: Node<'_, '_>, base: ElementBase) -> Option<Element> {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    Some(Element::Text(Text {
        base,
        x: number(node, "x"),
        y: number(node, "y"),
        text,
        font_size: optional_number(node, "font-size"),
        font_weight: attr(node, "font-weight").map(str::to_string),
        text_anchor: attr(node, "text-anchor").and_then(|value| {
            let anchor = TextAnchor::parse(value);
            if anchor.is_none() {
                log::warn!("Dropping unsupported text-anchor {:?}", value);
            }
            anchor
        }),
        dominant_baseline: attr(node, "dominant-baseline").map(str::to_string),
    }))
}
