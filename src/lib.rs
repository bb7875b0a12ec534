// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Reflow
//!
//! Layout reconstruction and text re-flow for translating PDF pages.
//!
//! ## Core Features
//!
//! ### Layout Analysis
//! - **Font Metrics**: median glyph width per font variant, measured from the page
//! - **Column Detection**: vertical gutters found from grouped horizontal gaps
//! - **Line Clustering**: glyphs grouped by baseline, rows split at wide gaps
//! - **Paragraph Assembly**: segments merged per column by vertical spacing
//! - **Reading Order**: a single linear score, rows before columns
//!
//! ### Text Fitting
//! - **Width Model**: per-class average widths, or measured widths when known
//! - **Greedy Wrapping**: optional hyphenation and line rebalancing
//! - **Iterative Reduction**: font size traded for fit down to a hard floor
//! - **Font Resolution**: per-job registry with explicit fallbacks
//!
//! ## Quick Start
//!
//! ```
//! use pdf_reflow::fonts::FontRegistry;
//! use pdf_reflow::geometry::BoundingBox;
//! use pdf_reflow::layout::{CharacterGlyph, PageInput};
//! use pdf_reflow::pipeline::ReflowPipeline;
//!
//! let chars: Vec<CharacterGlyph> = "Hello World"
//!     .chars()
//!     .enumerate()
//!     .map(|(i, c)| {
//!         let x = 72.0 + i as f32 * 6.0;
//!         let bbox = BoundingBox::new(x, 700.0, x + 6.0, 712.0);
//!         CharacterGlyph::new(c.to_string(), bbox, "Helvetica", 12.0)
//!     })
//!     .collect();
//!
//! let pipeline = ReflowPipeline::new();
//! let document = pipeline.analyze_document(&[PageInput::new(612.0, 792.0, chars)]);
//! assert_eq!(document.paragraphs[0].text, "Hello World");
//!
//! let translated = document.paragraphs[0].clone().translate("Hallo Welt", "de");
//! let mut registry = FontRegistry::new();
//! let fitted = pipeline.fit_paragraphs(vec![translated], &document.font_metrics, &mut registry);
//! assert_eq!(fitted[0].fitted_lines, vec!["Hallo Welt"]);
//! ```
//!
//! ## Features
//!
//! - `parallel`: analyze the pages of a document on the rayon thread pool
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry primitives
pub mod geometry;

// Layout analysis
pub mod layout;

// Font naming and resolution
pub mod fonts;

// Text fitting
pub mod fitting;

// Document pipeline
pub mod pipeline;

// Re-exports
pub use config::{FittingConfig, LayoutConfig, ReflowConfig};
pub use error::{Error, Result};
pub use fitting::{FitMethod, FitRequest, TextFitter, TextFittingResult};
pub use fonts::{FontRegistry, FontResolution};
pub use layout::{CharacterGlyph, PageAnalyzer, PageInput, PageLayout, ParagraphCluster};
pub use pipeline::{
    DocumentLayout, FittedParagraph, RawParagraph, ReflowPipeline, TranslatedParagraph,
};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values,
    /// so sorting never panics on malformed coordinates.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
