//! Font naming and resolution.
//!
//! Source paragraphs carry raw PDF font names. Before fitting, each is
//! parsed into family and style and resolved against a per-job
//! [`FontRegistry`] into a font the renderer can use.

pub mod name;
pub mod registry;

pub use name::{parse_font_name, Base14Family, FontClass, FontStyle, ParsedFontName};
pub use registry::{
    is_cjk_language, primary_language, FallbackReason, FontFace, FontRegistry, FontResolution,
};
