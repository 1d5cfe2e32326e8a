//! SVG text -> element model.

use super::decode::decode_svg_content;
use super::transform::parse_transform;
use super::{SvgError, SvgResult};
use crate::document::{
    DEFAULT_DOCUMENT_HEIGHT, DEFAULT_DOCUMENT_WIDTH, SvgDocument, XmlNamespace, size_view_box,
};
use crate::shapes::{self, Element, ElementBase, ElementId, ElementStyle, new_element_id};
use roxmltree::{Document, Node, ParsingOptions};
use std::borrow::Cow;
use std::collections::HashSet;

/// Prefixes the writer always declares itself.
const BUILTIN_PREFIXES: &[&str] = &["xml", "xlink"];

/// Containers whose subtrees never produce elements.
const SKIPPED_CONTAINERS: &[&str] = &[
    "defs", "symbol", "marker", "pattern", "mask", "clippath", "style", "script", "title", "desc",
    "metadata",
];

type ShapeParser = fn(Node<'_, '_>, ElementBase) -> Option<Element>;

/// Tag name -> element extractor.
const SHAPE_PARSERS: &[(&str, ShapeParser)] = &[
    ("rect", shapes::parse_rect),
    ("circle", shapes::parse_circle),
    ("ellipse", shapes::parse_ellipse),
    ("line", shapes::parse_line),
    ("path", shapes::parse_path),
    ("polyline", shapes::parse_polyline),
    ("polygon", shapes::parse_polygon),
    ("text", shapes::parse_text),
];

fn shape_parser(tag: &str) -> Option<ShapeParser> {
    SHAPE_PARSERS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, parser)| *parser)
}

/// Result of parsing SVG text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSvg {
    pub doc: SvgDocument,
    pub elements: Vec<Element>,
    /// Raw inner markup of the first `<defs>` element.
    pub defs: Option<String>,
    /// False when the input had no usable `<svg>` root.
    pub valid: bool,
}

impl ParsedSvg {
    fn invalid() -> Self {
        Self {
            doc: SvgDocument::default(),
            elements: Vec::new(),
            defs: None,
            valid: false,
        }
    }
}

/// Parse a leading decimal number the way JavaScript's `parseFloat` does,
/// ignoring any trailing text (`"12px"` -> 12).
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Attribute value, treating an empty value as missing.
pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.is_empty())
}

/// Numeric attribute, zero when missing or unparsable.
pub(crate) fn number(node: Node<'_, '_>, name: &str) -> f64 {
    optional_number(node, name).unwrap_or(0.0)
}

pub(crate) fn optional_number(node: Node<'_, '_>, name: &str) -> Option<f64> {
    attr(node, name).and_then(parse_float_prefix)
}

/// Uppercase a lowercase `<!doctype`, which XML does not accept.
fn normalize_doctype(text: &str) -> Cow<'_, str> {
    const KEYWORD: &str = "<!DOCTYPE";
    let Some(start) = text
        .as_bytes()
        .windows(KEYWORD.len())
        .position(|w| w.eq_ignore_ascii_case(KEYWORD.as_bytes()))
    else {
        return Cow::Borrowed(text);
    };
    let end = start + KEYWORD.len();
    if &text[start..end] == KEYWORD {
        return Cow::Borrowed(text);
    }
    Cow::Owned(format!("{}{}{}", &text[..start], KEYWORD, &text[end..]))
}

fn combine_transforms(inherited: Option<&str>, own: Option<&str>) -> Option<String> {
    let joined = [inherited, own]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

fn base_for(node: Node<'_, '_>, transform: Option<&str>) -> ElementBase {
    let text = |name: &str| attr(node, name).map(str::to_string);
    ElementBase {
        id: attr(node, "id").map(str::to_string).unwrap_or_else(new_element_id),
        visible: node.attribute("data-visible") != Some("false"),
        locked: node.attribute("data-locked") == Some("true"),
        style: ElementStyle {
            fill: text("fill"),
            stroke: text("stroke"),
            stroke_width: optional_number(node, "stroke-width"),
            stroke_dasharray: text("stroke-dasharray"),
            marker_start: text("marker-start"),
            marker_end: text("marker-end"),
            opacity: optional_number(node, "opacity"),
        },
        transform: transform.and_then(parse_transform),
    }
}

/// Depth-first extraction state.
struct Walker {
    elements: Vec<Element>,
    seen: HashSet<ElementId>,
}

impl Walker {
    fn walk(&mut self, parent: Node<'_, '_>, inherited: Option<&str>) {
        for node in parent.children().filter(|n| n.is_element()) {
            let tag = node.tag_name().name().to_ascii_lowercase();
            if SKIPPED_CONTAINERS.contains(&tag.as_str()) {
                continue;
            }

            let transform = combine_transforms(inherited, attr(node, "transform"));
            if let Some(parser) = shape_parser(&tag) {
                if let Some(element) = parser(node, base_for(node, transform.as_deref())) {
                    self.push(element);
                }
            }
            if node.has_children() {
                self.walk(node, transform.as_deref());
            }
        }
    }

    fn push(&mut self, mut element: Element) {
        if self.seen.contains(element.id()) {
            let fresh = new_element_id();
            log::debug!("Duplicate element id {:?}, renamed to {}", element.id(), fresh);
            element.base_mut().id = fresh;
        }
        self.seen.insert(element.id().to_string());
        self.elements.push(element);
    }
}

fn document_size(svg: Node<'_, '_>) -> SvgDocument {
    let view_box = attr(svg, "viewBox").filter(|vb| !vb.trim().is_empty());
    let numbers: Vec<f64> = view_box
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(parse_float_prefix)
        .collect();

    let dimension = |name: &str, from_view_box: Option<f64>, default: f64| {
        let value = optional_number(svg, name)
            .or(from_view_box)
            .unwrap_or(default);
        if value == 0.0 { default } else { value }
    };
    let width = dimension("width", numbers.get(2).copied(), DEFAULT_DOCUMENT_WIDTH);
    let height = dimension("height", numbers.get(3).copied(), DEFAULT_DOCUMENT_HEIGHT);

    SvgDocument {
        width,
        height,
        view_box: Some(
            view_box
                .map(str::to_string)
                .unwrap_or_else(|| size_view_box(width, height)),
        ),
        namespaces: extra_namespaces(svg),
    }
}

/// Prefixed namespaces in scope on the root, minus the ones always written.
fn extra_namespaces(svg: Node<'_, '_>) -> Vec<XmlNamespace> {
    let mut namespaces: Vec<XmlNamespace> = Vec::new();
    for ns in svg.namespaces() {
        let Some(prefix) = ns.name() else {
            continue;
        };
        if BUILTIN_PREFIXES.contains(&prefix) || namespaces.iter().any(|n| n.prefix == prefix) {
            continue;
        }
        namespaces.push(XmlNamespace {
            prefix: prefix.to_string(),
            uri: ns.uri().to_string(),
        });
    }
    namespaces
}

fn inner_markup(text: &str, node: Node<'_, '_>) -> String {
    match (node.first_child(), node.last_child()) {
        (Some(first), Some(last)) => text[first.range().start..last.range().end].to_string(),
        _ => String::new(),
    }
}

/// Parse SVG text or an SVG data URL.
pub fn try_parse_svg(input: &str) -> SvgResult<ParsedSvg> {
    let decoded = decode_svg_content(input);
    let text = normalize_doctype(&decoded);
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(&text, options)?;

    let svg = document
        .descendants()
        .find(|n| n.has_tag_name("svg"))
        .ok_or(SvgError::MissingRoot)?;

    let defs = svg
        .descendants()
        .skip(1)
        .find(|n| n.has_tag_name("defs"))
        .map(|defs| inner_markup(&text, defs));

    let mut walker = Walker {
        elements: Vec::new(),
        seen: HashSet::new(),
    };
    walker.walk(svg, None);
    log::debug!("Parsed {} elements from SVG", walker.elements.len());

    Ok(ParsedSvg {
        doc: document_size(svg),
        elements: walker.elements,
        defs,
        valid: true,
    })
}

/// Parse SVG text or an SVG data URL, never failing.
///
/// Unusable input is logged and yields `valid: false` with a default document.
pub fn parse_svg(input: &str) -> ParsedSvg {
    match try_parse_svg(input) {
        Ok(parsed) => parsed,
        Err(e) => {
            let preview: String = input.trim().chars().take(120).collect();
            log::warn!("Ignoring SVG content ({}): {}", e, preview);
            ParsedSvg::invalid()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Transform};

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12px"), Some(12.0));
        assert_eq!(parse_float_prefix("  -3.5e2x"), Some(-350.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn test_literal_document() {
        let parsed = parse_svg(
            r##"<svg width="100" height="50"><rect id="a" x="0" y="0" width="10" height="10" fill="#fff"/></svg>"##,
        );
        assert!(parsed.valid);
        assert_eq!(parsed.doc, SvgDocument::new(100.0, 50.0));
        let mut expected = Rectangle::new(0.0, 0.0, 10.0, 10.0).with_id("a");
        expected.base.style.fill = Some("#fff".to_string());
        assert_eq!(parsed.elements, vec![Element::Rect(expected)]);
        assert_eq!(parsed.defs, None);
    }

    #[test]
    fn test_containers_are_skipped() {
        let parsed = parse_svg(
            r#"<svg><defs><marker id="m"><rect id="inner" width="1" height="1"/></marker></defs><rect id="a" width="5" height="5"/></svg>"#,
        );
        assert_eq!(parsed.elements.len(), 1);
        assert_eq!(parsed.elements[0].id(), "a");
        assert_eq!(
            parsed.defs.as_deref(),
            Some(r#"<marker id="m"><rect id="inner" width="1" height="1"/></marker>"#)
        );
    }

    #[test]
    fn test_clip_path_and_metadata_skipped() {
        let parsed = parse_svg(
            r#"<svg><clipPath id="c"><circle r="3"/></clipPath><title>t</title><metadata><rect/></metadata><circle id="k" cx="1" cy="2" r="3"/></svg>"#,
        );
        assert_eq!(parsed.elements.len(), 1);
        match &parsed.elements[0] {
            Element::Ellipse(e) => assert_eq!((e.cx, e.cy, e.rx, e.ry), (1.0, 2.0, 3.0, 3.0)),
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tags_are_descended() {
        let parsed = parse_svg(
            r#"<svg><g transform="translate(10 20)"><foo><line id="l" x1="0" y1="0" x2="5" y2="5" transform="rotate(45)"/></foo></g></svg>"#,
        );
        assert_eq!(parsed.elements.len(), 1);
        assert_eq!(
            parsed.elements[0].base().transform,
            Some(Transform {
                x: Some(10.0),
                y: Some(20.0),
                rotation: Some(45.0),
                ..Transform::default()
            })
        );
    }

    #[test]
    fn test_nested_translate_is_not_composed() {
        let parsed = parse_svg(
            r#"<svg><g transform="translate(10 10)"><path id="p" d="M0 0" transform="translate(5 5)"/></g></svg>"#,
        );
        let transform = parsed.elements[0].base().transform.clone().unwrap();
        assert_eq!((transform.x, transform.y), (Some(10.0), Some(10.0)));
    }

    #[test]
    fn test_size_from_view_box_and_defaults() {
        let parsed = parse_svg(r#"<svg viewBox="0 0 300 200"></svg>"#);
        assert_eq!((parsed.doc.width, parsed.doc.height), (300.0, 200.0));
        assert_eq!(parsed.doc.view_box.as_deref(), Some("0 0 300 200"));

        let parsed = parse_svg(r#"<svg width="40px"></svg>"#);
        assert_eq!(
            (parsed.doc.width, parsed.doc.height),
            (40.0, DEFAULT_DOCUMENT_HEIGHT)
        );
        assert_eq!(
            parsed.doc.view_box,
            Some(size_view_box(40.0, DEFAULT_DOCUMENT_HEIGHT))
        );

        let parsed = parse_svg(r#"<svg width="0" height="abc" viewBox=" "></svg>"#);
        assert_eq!(parsed.doc, SvgDocument::default());
    }

    #[test]
    fn test_polyline_and_polygon_become_paths() {
        let parsed = parse_svg(
            r#"<svg><polyline id="a" points="0,0 10,10"/><polygon id="b" points="0 0 5 0 5 5" fill="red"/><polyline id="c"/></svg>"#,
        );
        assert_eq!(parsed.elements.len(), 2);
        match (&parsed.elements[0], &parsed.elements[1]) {
            (Element::Path(a), Element::Path(b)) => {
                assert_eq!(a.d, "M0 0 L10 10");
                assert_eq!(a.base.style.fill.as_deref(), Some("none"));
                assert_eq!(b.d, "M0 0 L5 0 L5 5 Z");
                assert_eq!(b.base.style.fill.as_deref(), Some("red"));
            }
            other => panic!("unexpected elements {other:?}"),
        }
    }

    #[test]
    fn test_text_and_flags() {
        let parsed = parse_svg(
            r#"<svg><text id="t" x="3" y="4" font-size="12" text-anchor="middle" data-locked="true" data-visible="false">Hello <tspan>world</tspan> &amp; co</text></svg>"#,
        );
        assert_eq!(parsed.elements.len(), 1);
        match &parsed.elements[0] {
            Element::Text(t) => {
                assert_eq!(t.text, "Hello world & co");
                assert_eq!(t.font_size, Some(12.0));
                assert!(t.base.locked);
                assert!(!t.base.visible);
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_line_refs_and_generated_ids() {
        let parsed = parse_svg(
            r#"<svg><rect width="1" height="1"/><line id="l" data-start-ref="a" data-end-ref="b"/></svg>"#,
        );
        assert!(!parsed.elements[0].id().is_empty());
        let line = parsed.elements[1].as_line().unwrap();
        assert_eq!(line.start_ref.as_deref(), Some("a"));
        assert_eq!(line.end_ref.as_deref(), Some("b"));
    }

    #[test]
    fn test_duplicate_ids_are_renamed() {
        let parsed = parse_svg(r#"<svg><rect id="a"/><rect id="a"/></svg>"#);
        assert_eq!(parsed.elements[0].id(), "a");
        assert_ne!(parsed.elements[1].id(), "a");
    }

    #[test]
    fn test_invalid_input() {
        assert!(!parse_svg("not svg at all").valid);
        assert!(!parse_svg("<html><body/></html>").valid);
        assert!(matches!(
            try_parse_svg("<html/>"),
            Err(SvgError::MissingRoot)
        ));
        assert!(matches!(try_parse_svg("<svg><rect></svg>"), Err(SvgError::Xml(_))));
    }

    #[test]
    fn test_doctype_and_data_url_input() {
        let svg = r#"<?xml version="1.0"?><!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd"><svg width="10" height="10"><rect id="r"/></svg>"#;
        let parsed = parse_svg(svg);
        assert!(parsed.valid);
        assert_eq!(parsed.elements.len(), 1);

        let illustrator = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" [<!ENTITY ns_svg "http://www.w3.org/2000/svg">]><svg xmlns="&ns_svg;" width="10" height="10"><rect id="r"/></svg>"#;
        let parsed = parse_svg(illustrator);
        assert!(parsed.valid);
        assert_eq!(parsed.elements.len(), 1);
        assert_eq!(parsed.elements[0].id(), "r");

        let parsed = parse_svg(r#"<!doctype svg><svg width="10" height="10"><rect id="r"/></svg>"#);
        assert!(parsed.valid);
        assert_eq!(parsed.elements.len(), 1);

        let url = "data:image/svg+xml,%3Csvg%20width%3D%227%22%3E%3Crect%20id%3D%22r%22%2F%3E%3C%2Fsvg%3E";
        let parsed = parse_svg(url);
        assert!(parsed.valid);
        assert_eq!(parsed.doc.width, 7.0);
        assert_eq!(parsed.elements[0].id(), "r");
    }

    #[test]
    fn test_root_namespaces_are_kept() {
        let parsed = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="10" height="10"><defs><linearGradient id="g" inkscape:collect="always"/></defs></svg>"#,
        );
        assert!(parsed.valid);
        assert_eq!(
            parsed.doc.namespaces,
            vec![XmlNamespace {
                prefix: "inkscape".to_string(),
                uri: "http://www.inkscape.org/namespaces/inkscape".to_string(),
            }]
        );

        let parsed = parse_svg(r#"<svg width="10" height="10"/>"#);
        assert!(parsed.doc.namespaces.is_empty());
    }

    #[test]
    fn test_svg_root_found_below_wrapper() {
        let parsed = parse_svg(r#"<div><svg width="5" height="5"><rect id="r"/></svg></div>"#);
        assert!(parsed.valid);
        assert_eq!(parsed.elements.len(), 1);
    }
}
