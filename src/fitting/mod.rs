//! Fitting translated text into source paragraph boxes.
//!
//! Translations rarely have the length of their source. [`TextFitter`]
//! wraps the new text into the original paragraph's box, trading font size
//! for lines until it fits, and reports truncation when it cannot.
//!
//! # Example
//!
//! ```
//! use pdf_reflow::fitting::{FitMethod, FitRequest, TextFitter};
//!
//! let fitter = TextFitter::default();
//! let request = FitRequest::new("A translated sentence", 200.0, 30.0, 12.0).with_target_lines(2);
//! let result = fitter.fit(&request);
//!
//! assert_eq!(result.fit_method, FitMethod::Iterative(1));
//! assert!(result.scaled_font_size < 12.0);
//! ```

pub mod fitter;
pub mod width_model;
pub mod wrap;

pub use fitter::{initial_reduction, FitMethod, FitRequest, TextFitter, TextFittingResult};
pub use width_model::{base_width_ratio, CaseProfile, StandardWidth, WidthModel};
pub use wrap::{is_cjk_char, LineWrapper, Words, WrapOutcome};
