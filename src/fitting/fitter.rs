//! Fitting translated text into the box of its source paragraph.
//!
//! The fitter shrinks the font slightly up front, wraps greedily, and on
//! overflow either uses spare height for extra lines (first attempt only)
//! or keeps reducing the size until the text fits or the size floor is hit.

use crate::config::FittingConfig;
use crate::fitting::width_model::{CaseProfile, StandardWidth, WidthModel};
use crate::fitting::wrap::{LineWrapper, Words};
use crate::fonts::{FontClass, FontStyle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base share of the font size removed before the first wrap.
pub const BASE_REDUCTION: f32 = 0.10;

/// Extra reduction for bold text.
pub const BOLD_REDUCTION: f32 = 0.05;

/// Reduction given back to mostly uppercase text.
pub const UPPERCASE_RELIEF: f32 = 0.03;

/// Smallest reduction ever applied.
pub const MIN_REDUCTION: f32 = 0.02;

/// How a fitting result was produced.
///
/// Serialized as `single_line`, `expanded_lines`, `iterative_<n>`,
/// `truncated_<n>`, `empty` or `not_fitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FitMethod {
    /// One-line source paragraph, text kept on one line
    SingleLine,
    /// Fitted by using more lines than the source had
    ExpandedLines,
    /// Wrapping succeeded on the given attempt
    Iterative(u32),
    /// Still overflowing after the given number of attempts
    Truncated(u32),
    /// Blank text
    Empty,
    /// Not passed through the fitter
    NotFitted,
}

impl FitMethod {
    /// Attempt number for iterative results.
    pub fn iterations(&self) -> Option<u32> {
        match self {
            FitMethod::Iterative(n) | FitMethod::Truncated(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMethod::SingleLine => write!(f, "single_line"),
            FitMethod::ExpandedLines => write!(f, "expanded_lines"),
            FitMethod::Iterative(n) => write!(f, "iterative_{}", n),
            FitMethod::Truncated(n) => write!(f, "truncated_{}", n),
            FitMethod::Empty => write!(f, "empty"),
            FitMethod::NotFitted => write!(f, "not_fitted"),
        }
    }
}

impl From<FitMethod> for String {
    fn from(method: FitMethod) -> Self {
        method.to_string()
    }
}

impl TryFrom<String> for FitMethod {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let parse_count = |digits: &str| {
            digits
                .parse::<u32>()
                .map_err(|_| format!("invalid fit method '{}'", value))
        };

        match value.as_str() {
            "single_line" => Ok(FitMethod::SingleLine),
            "expanded_lines" => Ok(FitMethod::ExpandedLines),
            "empty" => Ok(FitMethod::Empty),
            "not_fitted" => Ok(FitMethod::NotFitted),
            other => {
                if let Some(n) = other.strip_prefix("iterative_") {
                    parse_count(n).map(FitMethod::Iterative)
                } else if let Some(n) = other.strip_prefix("truncated_") {
                    parse_count(n).map(FitMethod::Truncated)
                } else {
                    Err(format!("invalid fit method '{}'", value))
                }
            },
        }
    }
}

/// Outcome of fitting one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFittingResult {
    /// Lines joined with `\n`
    pub fitted_text: String,
    /// Font size to render at
    pub scaled_font_size: f32,
    /// Wrapped lines
    pub lines: Vec<String>,
    /// Text did not fit in the box
    pub is_truncated: bool,
    /// Strategy that produced the result
    pub fit_method: FitMethod,
}

impl TextFittingResult {
    /// Build a result from wrapped lines.
    pub fn new(
        lines: Vec<String>,
        scaled_font_size: f32,
        is_truncated: bool,
        fit_method: FitMethod,
    ) -> Self {
        Self {
            fitted_text: lines.join("\n"),
            scaled_font_size,
            lines,
            is_truncated,
            fit_method,
        }
    }

    /// Result without any lines.
    pub fn empty(font_size: f32, fit_method: FitMethod) -> Self {
        Self::new(Vec::new(), font_size, false, fit_method)
    }

    /// Number of wrapped lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Text and box geometry for one fitting call.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRequest<'a> {
    /// Text to fit
    pub text: &'a str,
    /// Box width in points
    pub available_width: f32,
    /// Box height in points
    pub available_height: f32,
    /// Font size of the source paragraph
    pub original_font_size: f32,
    /// Width class of the target font
    pub font_class: FontClass,
    /// Style of the target font
    pub font_style: FontStyle,
    /// Number of lines the source paragraph used
    pub target_line_count: usize,
    /// Overrides the configured line height ratio
    pub line_height_ratio: Option<f32>,
    /// Character width measured in the source document
    pub standard_width: Option<StandardWidth>,
}

impl<'a> FitRequest<'a> {
    /// Create a request for a one-line sans regular paragraph.
    pub fn new(
        text: &'a str,
        available_width: f32,
        available_height: f32,
        original_font_size: f32,
    ) -> Self {
        Self {
            text,
            available_width,
            available_height,
            original_font_size,
            font_class: FontClass::default(),
            font_style: FontStyle::Regular,
            target_line_count: 1,
            line_height_ratio: None,
            standard_width: None,
        }
    }

    /// Set the target font's class and style.
    pub fn with_font(mut self, class: FontClass, style: FontStyle) -> Self {
        self.font_class = class;
        self.font_style = style;
        self
    }

    /// Set the number of lines of the source paragraph.
    pub fn with_target_lines(mut self, lines: usize) -> Self {
        self.target_line_count = lines;
        self
    }

    /// Override the line height ratio.
    pub fn with_line_height_ratio(mut self, ratio: f32) -> Self {
        self.line_height_ratio = Some(ratio);
        self
    }

    /// Use a measured character width.
    pub fn with_standard_width(mut self, standard: Option<StandardWidth>) -> Self {
        self.standard_width = standard;
        self
    }
}

/// Share of the original size removed before the first wrap.
///
/// # Examples
///
/// ```
/// use pdf_reflow::fitting::{initial_reduction, CaseProfile};
/// use pdf_reflow::fonts::FontStyle;
///
/// let mixed = CaseProfile::of("Quarterly results");
/// assert!((initial_reduction(FontStyle::Regular, &mixed) - 0.10).abs() < 1e-6);
/// assert!((initial_reduction(FontStyle::Bold, &mixed) - 0.15).abs() < 1e-6);
///
/// let caps = CaseProfile::of("QUARTERLY RESULTS");
/// assert!((initial_reduction(FontStyle::Regular, &caps) - 0.07).abs() < 1e-6);
/// ```
pub fn initial_reduction(style: FontStyle, profile: &CaseProfile) -> f32 {
    let mut reduction = BASE_REDUCTION;
    if style.is_bold() {
        reduction += BOLD_REDUCTION;
    }
    if profile.is_mostly_uppercase() {
        reduction = (reduction - UPPERCASE_RELIEF).max(MIN_REDUCTION);
    }
    reduction
}

/// Fits text into boxes by wrapping and size reduction.
#[derive(Debug, Clone, Default)]
pub struct TextFitter {
    config: FittingConfig,
}

impl TextFitter {
    /// Create a fitter.
    pub fn new(config: FittingConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &FittingConfig {
        &self.config
    }

    /// Fit the requested text.
    pub fn fit(&self, request: &FitRequest<'_>) -> TextFittingResult {
        let original = request.original_font_size;
        let text = request.text.trim();
        if text.is_empty() {
            return TextFittingResult::empty(original, FitMethod::Empty);
        }

        let profile = CaseProfile::of(text);
        let floor = self.config.size_floor(original);
        let reduction = initial_reduction(request.font_style, &profile);
        let mut size = (original * (1.0 - reduction)).max(floor);

        if request.target_line_count <= 1 {
            let lines = vec![request.text.to_string()];
            return TextFittingResult::new(lines, size, false, FitMethod::SingleLine);
        }

        let model = WidthModel::new(request.font_class, request.font_style, text)
            .with_standard_width(request.standard_width);
        let words = Words::split(text);
        let target = request.target_line_count;
        let line_height_ratio = request
            .line_height_ratio
            .unwrap_or(self.config.line_height_ratio);
        let max_iterations = self.config.max_iterations.max(1);

        let mut iteration = 1;
        loop {
            let wrapper = self.wrapper(&model, size, request.available_width);
            let outcome = wrapper.wrap(&words, target);

            if !outcome.is_truncated {
                log::debug!(
                    "Fitted {} lines at {:.2}pt on attempt {}",
                    outcome.lines.len(),
                    size,
                    iteration
                );
                let lines = self.balance(&wrapper, &words, outcome.lines);
                return TextFittingResult::new(lines, size, false, FitMethod::Iterative(iteration));
            }

            if iteration == 1 {
                let expanded = (request.available_height / (size * line_height_ratio)).floor();
                if expanded.is_finite() && expanded as usize > target {
                    let expanded_outcome = wrapper.wrap(&words, expanded as usize);
                    if !expanded_outcome.is_truncated {
                        log::debug!(
                            "Fitted by expanding {} -> {} lines at {:.2}pt",
                            target,
                            expanded_outcome.lines.len(),
                            size
                        );
                        let lines = self.balance(&wrapper, &words, expanded_outcome.lines);
                        return TextFittingResult::new(lines, size, false, FitMethod::ExpandedLines);
                    }
                }
            }

            if iteration >= max_iterations || size <= floor {
                log::warn!(
                    "Text still overflows after {} attempts at {:.2}pt (box {:.1}x{:.1})",
                    iteration,
                    size,
                    request.available_width,
                    request.available_height
                );
                let method = FitMethod::Truncated(iteration);
                return TextFittingResult::new(outcome.lines, size, true, method);
            }

            size = (size * self.config.reduction_factor).max(floor);
            iteration += 1;
        }
    }

    fn wrapper<'m>(&self, model: &'m WidthModel, size: f32, width: f32) -> LineWrapper<'m> {
        LineWrapper::new(model, size, width)
            .with_margin(self.config.width_safety_margin)
            .with_word_breaking(self.config.enable_word_breaking)
    }

    fn balance(
        &self,
        wrapper: &LineWrapper<'_>,
        words: &Words<'_>,
        lines: Vec<String>,
    ) -> Vec<String> {
        if !self.config.rebalance_lines {
            return lines;
        }
        wrapper.rebalance(words, &lines).unwrap_or(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_fit_method_strings() {
        assert_eq!(FitMethod::Iterative(2).to_string(), "iterative_2");
        assert_eq!(FitMethod::Truncated(10).to_string(), "truncated_10");
        assert_eq!(FitMethod::try_from("expanded_lines".to_string()), Ok(FitMethod::ExpandedLines));
        assert_eq!(FitMethod::try_from("truncated_3".to_string()), Ok(FitMethod::Truncated(3)));
        assert!(FitMethod::try_from("iterative_x".to_string()).is_err());
        assert!(FitMethod::try_from("shrunk".to_string()).is_err());

        let json = serde_json::to_string(&FitMethod::NotFitted).unwrap();
        assert_eq!(json, "\"not_fitted\"");
        assert_eq!(FitMethod::Iterative(4).iterations(), Some(4));
        assert_eq!(FitMethod::SingleLine.iterations(), None);
    }

    #[test]
    fn test_blank_text() {
        let result = TextFitter::default().fit(&FitRequest::new("  \n", 100.0, 20.0, 12.0));
        assert_eq!(result.fit_method, FitMethod::Empty);
        assert!(result.lines.is_empty());
        assert_eq!(result.scaled_font_size, 12.0);
    }

    #[test]
    fn test_single_line_keeps_text() {
        let request = FitRequest::new("Bonjour le monde", 50.0, 14.0, 12.0);
        let result = TextFitter::default().fit(&request);
        assert_eq!(result.fit_method, FitMethod::SingleLine);
        assert_eq!(result.lines, vec!["Bonjour le monde"]);
        assert!(approx(result.scaled_font_size, 10.8));
        assert!(!result.is_truncated);
    }

    #[test]
    fn test_bold_single_line() {
        let request =
            FitRequest::new("Titre", 50.0, 14.0, 20.0).with_font(FontClass::Serif, FontStyle::Bold);
        let result = TextFitter::default().fit(&request);
        assert!(approx(result.scaled_font_size, 17.0));
    }

    #[test]
    fn test_fits_first_attempt() {
        let request = FitRequest::new("short text", 200.0, 30.0, 12.0).with_target_lines(2);
        let result = TextFitter::default().fit(&request);
        assert_eq!(result.fit_method, FitMethod::Iterative(1));
        assert_eq!(result.lines, vec!["short text"]);
        assert_eq!(result.fitted_text, "short text");
    }

    #[test]
    fn test_fits_on_second_attempt() {
        // three lines at 10.8pt, two at 8.64pt
        let text = "abcde abcde abcde abcde abcde abcde abcde";
        let request = FitRequest::new(text, 100.0, 28.8, 12.0).with_target_lines(2);
        let result = TextFitter::default().fit(&request);
        assert_eq!(result.fit_method, FitMethod::Iterative(2));
        assert!(approx(result.scaled_font_size, 8.64));
        assert_eq!(result.lines, vec!["abcde abcde abcde abcde", "abcde abcde abcde"]);
        assert!(!result.is_truncated);
    }

    #[test]
    fn test_expanded_lines() {
        let text = "abcde abcde abcde abcde abcde abcde abcde";
        let request = FitRequest::new(text, 100.0, 100.0, 12.0).with_target_lines(2);
        let result = TextFitter::default().fit(&request);
        assert_eq!(result.fit_method, FitMethod::ExpandedLines);
        assert_eq!(result.lines.len(), 3);
        assert!(approx(result.scaled_font_size, 10.8));
    }

    #[test]
    fn test_tall_line_height_blocks_expansion() {
        // 100 / (10.8 * 5.0) leaves room for one line only
        let text = "abcde abcde abcde abcde abcde abcde abcde";
        let request = FitRequest::new(text, 100.0, 100.0, 12.0).with_target_lines(2);

        let result = TextFitter::default().fit(&request.clone().with_line_height_ratio(5.0));
        assert_eq!(result.fit_method, FitMethod::Iterative(2));
        assert!(approx(result.scaled_font_size, 8.64));

        let fitter = TextFitter::new(FittingConfig::default().with_line_height_ratio(5.0));
        assert_eq!(fitter.fit(&request).fit_method, FitMethod::Iterative(2));

        // the request wins over the config
        let result = fitter.fit(&request.with_line_height_ratio(1.2));
        assert_eq!(result.fit_method, FitMethod::ExpandedLines);
    }

    #[test]
    fn test_reduction_factor_step() {
        let text = "abcde abcde abcde abcde abcde abcde abcde";
        let request = FitRequest::new(text, 100.0, 28.8, 12.0).with_target_lines(2);
        let fitter = TextFitter::new(FittingConfig::default().with_reduction_factor(0.5));
        let result = fitter.fit(&request);
        assert_eq!(result.fit_method, FitMethod::Iterative(2));
        assert!(approx(result.scaled_font_size, 5.4));
        assert_eq!(result.lines, vec!["abcde abcde abcde abcde abcde abcde", "abcde"]);
    }

    #[test]
    fn test_rebalanced_lines() {
        // 4.84pt per character at 9pt
        let text = "aaaaaaaaa aaaaaaaaaa bb";
        let request = FitRequest::new(text, 100.0, 30.0, 10.0)
            .with_target_lines(3)
            .with_standard_width(Some(StandardWidth::new(4.84, 9.0)));

        let result = TextFitter::default().fit(&request);
        assert_eq!(result.lines, vec!["aaaaaaaaa aaaaaaaaaa", "bb"]);

        let fitter = TextFitter::new(FittingConfig::default().with_rebalance(true));
        let result = fitter.fit(&request);
        assert_eq!(result.fit_method, FitMethod::Iterative(1));
        assert_eq!(result.lines, vec!["aaaaaaaaa", "aaaaaaaaaa bb"]);
        assert_eq!(result.fitted_text, "aaaaaaaaa\naaaaaaaaaa bb");
    }

    #[test]
    fn test_truncated_at_floor() {
        let text = "word ".repeat(200);
        let request = FitRequest::new(&text, 100.0, 30.0, 12.0).with_target_lines(2);
        let result = TextFitter::default().fit(&request);
        assert!(result.is_truncated);
        assert_eq!(result.fit_method, FitMethod::Truncated(6));
        assert_eq!(result.scaled_font_size, 4.0);
        assert_eq!(result.lines.len(), 2);
    }

    #[test]
    fn test_iteration_cap() {
        let text = "word ".repeat(200);
        let fitter = TextFitter::new(FittingConfig::default().with_max_iterations(3));
        let result = fitter.fit(&FitRequest::new(&text, 100.0, 30.0, 12.0).with_target_lines(2));
        assert_eq!(result.fit_method, FitMethod::Truncated(3));
        assert!(result.scaled_font_size > 4.0);
    }

    #[test]
    fn test_floor_raises_tiny_fonts() {
        let request = FitRequest::new("tiny print", 100.0, 10.0, 3.0);
        let result = TextFitter::default().fit(&request);
        assert_eq!(result.scaled_font_size, 4.0);
    }

    #[test]
    fn test_word_breaking() {
        let word = "a".repeat(40);
        let fitter = TextFitter::new(FittingConfig::default().with_word_breaking(true));
        let result = fitter.fit(&FitRequest::new(&word, 100.0, 30.0, 12.0).with_target_lines(3));
        assert_eq!(result.fit_method, FitMethod::Iterative(1));
        assert_eq!(result.lines.len(), 3);
        assert!(result.lines[0].ends_with('-'));
        assert_eq!(result.lines.concat().replace('-', ""), word);
    }

    #[test]
    fn test_measured_width_used() {
        // 2pt per character at 12pt: 1.8pt at 10.8pt, four words per line
        let text = "abcdefghij ".repeat(8);
        let request = FitRequest::new(&text, 100.0, 30.0, 12.0)
            .with_target_lines(2)
            .with_standard_width(Some(StandardWidth::new(2.0, 12.0)));
        let result = TextFitter::default().fit(&request);
        assert_eq!(result.fit_method, FitMethod::Iterative(1));
        assert_eq!(result.lines.len(), 2);
    }
}
