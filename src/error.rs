//! Error types for the reflow library.
//!
//! Layout analysis and text fitting are total over their inputs: empty or
//! degenerate data yields empty or pass-through results. Errors are only
//! raised at the boundaries (JSON decoding, file IO) and by the explicit
//! validation helpers.

/// Result type alias for reflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or validating reflow inputs.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A glyph with an inverted or non-finite bounding box
    #[error("Invalid glyph {text:?}: {reason}")]
    InvalidGlyph {
        /// Text of the offending glyph
        text: String,
        /// Why the glyph was rejected
        reason: String,
    },

    /// Page dimensions that cannot hold any content
    #[error("Invalid page geometry: {0}")]
    InvalidPage(String),

    /// A configuration value outside its valid range
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
