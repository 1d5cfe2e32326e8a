//! Element model -> SVG text.

use super::transform::serialize_transform;
use crate::document::SvgDocument;
use crate::shapes::{Element, ElementBase};
use std::fmt::{Display, Write as _};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Escape text for use in attribute values and character data.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Accumulates the markup of one element at a time.
#[derive(Debug, Default)]
pub struct MarkupWriter {
    buf: String,
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a tag and write its `id`.
    pub fn start(&mut self, tag: &str, id: &str) {
        let _ = write!(self.buf, "<{tag}");
        self.attr("id", id);
    }

    pub fn attr(&mut self, name: &str, value: impl Display) {
        let _ = write!(self.buf, " {name}=\"{}\"", escape_xml(&value.to_string()));
    }

    pub fn attr_opt<T: Display>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.attr(name, value);
        }
    }

    /// Shared style, lock flag and transform attributes.
    ///
    /// An unset `fill` is written as `none`.
    pub fn common(&mut self, base: &ElementBase) {
        let style = &base.style;
        self.attr("fill", style.fill.as_deref().unwrap_or("none"));
        self.attr_opt("stroke", style.stroke.as_deref());
        self.attr_opt("stroke-width", style.stroke_width);
        self.attr_opt("stroke-dasharray", style.stroke_dasharray.as_deref());
        self.attr_opt("marker-end", style.marker_end.as_deref());
        self.attr_opt("marker-start", style.marker_start.as_deref());
        self.attr_opt("opacity", style.opacity);
        if base.locked {
            self.attr("data-locked", "true");
        }
        if let Some(transform) = base.transform.as_ref().and_then(serialize_transform) {
            self.attr("transform", transform);
        }
    }

    pub fn end_empty(&mut self) {
        self.buf.push_str(" />");
    }

    pub fn end_with_text(&mut self, tag: &str, text: &str) {
        let _ = write!(self.buf, ">{}</{tag}>", escape_xml(text));
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Render a document and its elements as one `<svg>` string.
///
/// Hidden elements are skipped. `defs` is inlined verbatim when non-empty.
pub fn build_svg_markup(doc: &SvgDocument, elements: &[Element], defs: Option<&str>) -> String {
    let mut out = String::new();
    let _ = write!(out, r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}""#);
    for ns in &doc.namespaces {
        let _ = write!(out, r#" xmlns:{}="{}""#, ns.prefix, escape_xml(&ns.uri));
    }
    let _ = write!(
        out,
        r#" width="{}" height="{}" viewBox="{}">"#,
        doc.width,
        doc.height,
        escape_xml(&doc.effective_view_box()),
    );
    if let Some(defs) = defs.filter(|d| !d.is_empty()) {
        let _ = write!(out, "<defs>{defs}</defs>");
    }
    let body: Vec<String> = elements
        .iter()
        .filter(|el| el.is_visible())
        .map(|el| {
            let mut writer = MarkupWriter::new();
            el.write_svg(&mut writer);
            writer.finish()
        })
        .collect();
    out.push_str(&body.join("\n"));
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::XmlNamespace;
    use crate::shapes::{Ellipse, Path, Rectangle, Transform};

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
    }

    #[test]
    fn test_empty_document() {
        let doc = SvgDocument {
            width: 100.0,
            height: 50.0,
            view_box: Some("  ".to_string()),
            ..SvgDocument::default()
        };
        assert_eq!(
            build_svg_markup(&doc, &[], None),
            format!(
                r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}" width="100" height="50" viewBox="0 0 100 50"></svg>"#
            )
        );
    }

    #[test]
    fn test_hidden_elements_are_skipped() {
        let mut hidden = Rectangle::new(0.0, 0.0, 1.0, 1.0).with_id("hidden");
        hidden.base.visible = false;
        let elements = vec![
            Element::from(hidden),
            Element::from(Ellipse::circle(5.0, 5.0, 2.0).with_id("shown")),
        ];
        let svg = build_svg_markup(&SvgDocument::new(10.0, 10.0), &elements, None);
        assert!(!svg.contains("hidden"));
        assert!(svg.contains(r#"<ellipse id="shown" cx="5" cy="5" rx="2" ry="2" fill="none" />"#));
    }

    #[test]
    fn test_defs_are_inlined_first() {
        let elements = vec![Element::from(Path::new("M0 0").with_id("p"))];
        let defs = r#"<marker id="m"><path d="M0 0"/></marker>"#;
        let svg = build_svg_markup(&SvgDocument::new(10.0, 10.0), &elements, Some(defs));
        let defs_at = svg.find("<defs><marker").unwrap();
        let path_at = svg.find(r#"<path id="p""#).unwrap();
        assert!(defs_at < path_at);

        let svg = build_svg_markup(&SvgDocument::new(10.0, 10.0), &elements, Some(""));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_extra_namespaces_on_root() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.namespaces.push(XmlNamespace {
            prefix: "inkscape".to_string(),
            uri: "http://www.inkscape.org/namespaces/inkscape".to_string(),
        });
        let svg = build_svg_markup(&doc, &[], None);
        assert!(svg.starts_with(&format!(
            r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="10""#
        )));
    }

    #[test]
    fn test_common_attributes() {
        let mut rect = Rectangle::new(0.0, 0.0, 1.0, 1.0).with_id("r");
        rect.base.locked = true;
        rect.base.style.stroke = Some("#000".to_string());
        rect.base.style.stroke_width = Some(1.5);
        rect.base.style.marker_end = Some("url(#arrow)".to_string());
        rect.base.style.opacity = Some(0.5);
        rect.base.transform = Some(Transform {
            rotation: Some(90.0),
            ..Transform::default()
        });
        let mut out = MarkupWriter::new();
        out.common(&rect.base);
        assert_eq!(
            out.finish(),
            r##" fill="none" stroke="#000" stroke-width="1.5" marker-end="url(#arrow)" opacity="0.5" data-locked="true" transform="rotate(90)""##
        );
    }
}
