//! SVG text <-> element model conversion.

mod decode;
mod parser;
mod transform;
mod writer;

pub use decode::{decode_data_url, decode_svg_content, svg_to_data_url};
pub use parser::{ParsedSvg, parse_svg, try_parse_svg};
pub use transform::{parse_transform, serialize_transform};
pub use writer::{MarkupWriter, build_svg_markup};

pub(crate) use parser::{attr, number, optional_number, parse_float_prefix};

use thiserror::Error;

/// SVG decoding and parsing errors.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("Invalid data URL: {0}")]
    DataUrl(String),
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("No <svg> root element found")]
    MissingRoot,
}

/// Result type for SVG operations.
pub type SvgResult<T> = Result<T, SvgError>;
