//! `transform` attribute text.
//!
//! Only the first `translate`, `scale` and `rotate` call in a string is read,
//! and nested transforms are composed by joining their strings rather than by
//! multiplying matrices.

use super::parser::parse_float_prefix;
use crate::shapes::Transform;

/// Argument text of the first `name(...)` call in `s`.
fn call_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let open = s.find(&format!("{name}("))? + name.len() + 1;
    let rest = &s[open..];
    let args = &rest[..rest.find(')')?];
    (!args.is_empty()).then_some(args)
}

fn call_numbers(args: &str) -> Vec<Option<f64>> {
    args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float_prefix)
        .collect()
}

/// Parse a transform string. Returns `None` if nothing usable was found.
pub fn parse_transform(text: &str) -> Option<Transform> {
    let mut result = Transform::default();

    if let Some(args) = call_args(text, "translate") {
        let values = call_numbers(args);
        result.x = values.first().copied().flatten();
        result.y = values.get(1).copied().flatten();
    }

    if let Some(args) = call_args(text, "scale") {
        let values = call_numbers(args);
        result.scale_x = values.first().copied().flatten();
        result.scale_y = values.get(1).copied().flatten().or(result.scale_x);
    }

    if let Some(args) = call_args(text, "rotate") {
        result.rotation = parse_float_prefix(args);
    }

    (!result.is_empty()).then_some(result)
}

/// Render a transform as attribute text.
///
/// Each of `translate`, `scale` and `rotate` is emitted only if one of its
/// components is set; missing partners default to identity.
pub fn serialize_transform(transform: &Transform) -> Option<String> {
    let mut segments = Vec::new();
    if transform.x.is_some() || transform.y.is_some() {
        segments.push(format!(
            "translate({} {})",
            transform.x.unwrap_or(0.0),
            transform.y.unwrap_or(0.0)
        ));
    }
    if transform.scale_x.is_some() || transform.scale_y.is_some() {
        let sx = transform.scale_x.unwrap_or(1.0);
        let sy = transform.scale_y.unwrap_or(sx);
        segments.push(format!("scale({sx} {sy})"));
    }
    if let Some(rotation) = transform.rotation {
        segments.push(format!("rotate({rotation})"));
    }
    (!segments.is_empty()).then(|| segments.join(" "))
}
