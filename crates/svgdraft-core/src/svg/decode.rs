//! `data:image/svg+xml` URL handling.

use super::{SvgError, SvgResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

const SVG_DATA_PREFIX: &str = "data:image/svg+xml";

/// Characters `encodeURIComponent` leaves alone, minus `'` which we encode too.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Decode a `data:image/svg+xml[;base64],<payload>` URL into SVG text.
pub fn decode_data_url(url: &str) -> SvgResult<String> {
    let rest = url
        .trim()
        .strip_prefix(SVG_DATA_PREFIX)
        .ok_or_else(|| SvgError::DataUrl("not an SVG data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SvgError::DataUrl("missing ',' separator".to_string()))?;

    if header.split(';').any(|param| param.trim().eq_ignore_ascii_case("base64")) {
        // Base64 payloads are sometimes percent-encoded as well.
        let unescaped = percent_decode_str(payload)
            .decode_utf8()
            .map_err(|e| SvgError::DataUrl(e.to_string()))?;
        let compact: String = unescaped.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| SvgError::DataUrl(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| SvgError::DataUrl(e.to_string()))
    } else {
        percent_decode_str(payload)
            .decode_utf8()
            .map(|s| s.into_owned())
            .map_err(|e| SvgError::DataUrl(e.to_string()))
    }
}

/// Turn loader input into SVG text.
///
/// Data URLs are decoded; anything else is returned trimmed. A data URL that
/// fails to decode is logged and handed on unchanged.
pub fn decode_svg_content(input: &str) -> String {
    let trimmed = input.trim();
    if !trimmed.starts_with(SVG_DATA_PREFIX) {
        return trimmed.to_string();
    }
    match decode_data_url(trimmed) {
        Ok(svg) => svg,
        Err(e) => {
            log::warn!("Failed to decode SVG data URL: {}", e);
            trimmed.to_string()
        }
    }
}

/// Encode SVG text as a `data:image/svg+xml;charset=utf-8,` URL.
///
/// XML declarations are dropped. Returns `None` for blank input.
pub fn svg_to_data_url(svg: &str) -> Option<String> {
    let cleaned = strip_xml_declarations(svg.trim());
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(format!(
        "{};charset=utf-8,{}",
        SVG_DATA_PREFIX,
        utf8_percent_encode(cleaned, COMPONENT)
    ))
}

fn strip_xml_declarations(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(start) = rest.find("<?xml") {
        out.push_str(&rest[..start]);
        match rest[start..].find("?>") {
            Some(end) => rest = &rest[start + end + 2..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(decode_svg_content(&format!("  {SVG}\n")), SVG);
    }

    #[test]
    fn test_base64_data_url() {
        let url = format!("data:image/svg+xml;base64,{}", STANDARD.encode(SVG));
        assert_eq!(decode_svg_content(&url), SVG);
    }

    #[test]
    fn test_percent_encoded_data_url() {
        let url = "data:image/svg+xml,%3Csvg%20width%3D%225%22%2F%3E";
        assert_eq!(decode_svg_content(url), r#"<svg width="5"/>"#);
    }

    #[test]
    fn test_bad_base64_falls_back_to_input() {
        let url = "data:image/svg+xml;base64,@@@";
        assert!(decode_data_url(url).is_err());
        assert_eq!(decode_svg_content(url), url);
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            decode_data_url("data:image/svg+xml;base64"),
            Err(SvgError::DataUrl(_))
        ));
    }

    #[test]
    fn test_svg_to_data_url() {
        let url = svg_to_data_url(r#"<?xml version="1.0"?><svg a='1' b="2"/>"#).unwrap();
        assert_eq!(
            url,
            "data:image/svg+xml;charset=utf-8,%3Csvg%20a%3D%271%27%20b%3D%222%22%2F%3E"
        );
        assert_eq!(decode_svg_content(&url), r#"<svg a='1' b="2"/>"#);
    }

    #[test]
    fn test_svg_to_data_url_blank() {
        assert_eq!(svg_to_data_url("   "), None);
        assert_eq!(svg_to_data_url("<?xml version=\"1.0\"?>"), None);
    }
}
