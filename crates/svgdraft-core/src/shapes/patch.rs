//! Partial updates to elements.

use super::{Element, ElementId, TextAnchor, Transform};

/// A partial update. `None` leaves the field alone.
///
/// Fields that do not exist on the target's type are ignored, so one patch
/// can be applied to a mixed selection. Double options set (`Some(Some(v))`)
/// or clear (`Some(None)`) optional fields. Ellipse radii are required, so
/// `rx`/`ry` can only be cleared on rects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    // rect / text
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    // rect corner radii and ellipse radii
    pub rx: Option<Option<f64>>,
    pub ry: Option<Option<f64>>,
    // ellipse
    pub cx: Option<f64>,
    pub cy: Option<f64>,
    // line
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub start_ref: Option<Option<ElementId>>,
    pub end_ref: Option<Option<ElementId>>,
    // path
    pub d: Option<String>,
    // text
    pub text: Option<String>,
    pub font_size: Option<Option<f64>>,
    pub font_weight: Option<Option<String>>,
    pub text_anchor: Option<Option<TextAnchor>>,
    pub dominant_baseline: Option<Option<String>>,
    // shared
    pub fill: Option<Option<String>>,
    pub stroke: Option<Option<String>>,
    pub stroke_width: Option<Option<f64>>,
    pub stroke_dasharray: Option<Option<String>>,
    pub marker_start: Option<Option<String>>,
    pub marker_end: Option<Option<String>>,
    pub opacity: Option<Option<f64>>,
    pub transform: Option<Option<Transform>>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl ElementPatch {
    /// Patch that moves an element's position field(s) to `(x, y)`.
    ///
    /// Picks the fields that act as the position for each type: `x`/`y` for
    /// rects and text, `cx`/`cy` for ellipses, the transform translation for
    /// paths. Lines have no position.
    pub fn position_of(element: &Element, x: f64, y: f64) -> Self {
        match element {
            Element::Rect(_) | Element::Text(_) => Self {
                x: Some(x),
                y: Some(y),
                ..Self::default()
            },
            Element::Ellipse(_) => Self {
                cx: Some(x),
                cy: Some(y),
                ..Self::default()
            },
            Element::Path(path) => {
                let mut transform = path.base.transform.clone().unwrap_or_default();
                transform.x = Some(x);
                transform.y = Some(y);
                Self {
                    transform: Some(Some(transform)),
                    ..Self::default()
                }
            }
            Element::Line(_) => Self::default(),
        }
    }

    /// Apply the patch in place.
    pub fn apply(&self, element: &mut Element) {
        match element {
            Element::Rect(rect) => {
                set(&mut rect.x, &self.x);
                set(&mut rect.y, &self.y);
                set(&mut rect.width, &self.width);
                set(&mut rect.height, &self.height);
                set(&mut rect.rx, &self.rx);
                set(&mut rect.ry, &self.ry);
            }
            Element::Ellipse(ellipse) => {
                set(&mut ellipse.cx, &self.cx);
                set(&mut ellipse.cy, &self.cy);
                if let Some(Some(rx)) = self.rx {
                    ellipse.rx = rx;
                }
                if let Some(Some(ry)) = self.ry {
                    ellipse.ry = ry;
                }
            }
            Element::Line(line) => {
                set(&mut line.x1, &self.x1);
                set(&mut line.y1, &self.y1);
                set(&mut line.x2, &self.x2);
                set(&mut line.y2, &self.y2);
                set(&mut line.start_ref, &self.start_ref);
                set(&mut line.end_ref, &self.end_ref);
            }
            Element::Path(path) => {
                set(&mut path.d, &self.d);
            }
            Element::Text(text) => {
                set(&mut text.x, &self.x);
                set(&mut text.y, &self.y);
                set(&mut text.text, &self.text);
                set(&mut text.font_size, &self.font_size);
                set(&mut text.font_weight, &self.font_weight);
                set(&mut text.text_anchor, &self.text_anchor);
                set(&mut text.dominant_baseline, &self.dominant_baseline);
            }
        }

        let base = element.base_mut();
        set(&mut base.style.fill, &self.fill);
        set(&mut base.style.stroke, &self.stroke);
        set(&mut base.style.stroke_width, &self.stroke_width);
        set(&mut base.style.stroke_dasharray, &self.stroke_dasharray);
        set(&mut base.style.marker_start, &self.marker_start);
        set(&mut base.style.marker_end, &self.marker_end);
        set(&mut base.style.opacity, &self.opacity);
        set(&mut base.transform, &self.transform);
        set(&mut base.visible, &self.visible);
        set(&mut base.locked, &self.locked);
    }
}
