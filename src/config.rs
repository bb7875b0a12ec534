//! Configuration for layout analysis and text fitting.
//!
//! Every field has a default, so a partial JSON document is a valid config:
//!
//! ```
//! use pdf_reflow::config::ReflowConfig;
//!
//! let config = ReflowConfig::from_json(r#"{"fitting": {"enable_word_breaking": true}}"#).unwrap();
//! assert!(config.fitting.enable_word_breaking);
//! assert_eq!(config.fitting.max_iterations, 10);
//! assert_eq!(config.layout.column_tolerance, 50.0);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflowConfig {
    /// Thresholds used while reconstructing page structure.
    pub layout: LayoutConfig,
    /// Knobs of the text fitter.
    pub fitting: FittingConfig,
}

impl ReflowConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the fitter settings.
    pub fn with_fitting(mut self, fitting: FittingConfig) -> Self {
        self.fitting = fitting;
        self
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject values the algorithms cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.fitting.validate()
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

fn require_unit_interval(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

/// Thresholds for column, line and paragraph reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Size assumed for glyphs that report none.
    pub default_font_size: f32,
    /// Minimum horizontal gap that splits a row into segments.
    pub row_gap_floor: f32,
    /// Row split gap as a multiple of the glyph's font size.
    pub row_gap_factor: f32,
    /// Segments whose left edges are closer than this share a column.
    pub column_tolerance: f32,
    /// Paragraph break when the vertical gap exceeds this multiple of the font size.
    pub paragraph_gap_factor: f32,
    /// Nominal glyph advance as a fraction of the font size.
    pub nominal_char_width_ratio: f32,
    /// A gap is a column candidate above this many nominal advances.
    pub candidate_gap_factor: f32,
    /// Candidates whose midpoints are closer than this are grouped.
    pub gap_merge_distance: f32,
    /// Smallest average gap accepted as a gutter.
    pub min_column_gap: f32,
    /// Smallest average gap accepted as a gutter, relative to page width.
    pub relative_column_gap: f32,
    /// Fraction of the content height a gutter must span.
    pub column_coverage_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    /// Create layout thresholds with defaults.
    pub fn new() -> Self {
        Self {
            default_font_size: 12.0,
            row_gap_floor: 20.0,
            row_gap_factor: 2.0,
            column_tolerance: 50.0,
            paragraph_gap_factor: 1.5,
            nominal_char_width_ratio: 0.6,
            candidate_gap_factor: 1.5,
            gap_merge_distance: 30.0,
            min_column_gap: 10.0,
            relative_column_gap: 0.05,
            column_coverage_ratio: 0.1,
        }
    }

    /// Set the column bucket tolerance.
    pub fn with_column_tolerance(mut self, tolerance: f32) -> Self {
        self.column_tolerance = tolerance;
        self
    }

    /// Set the paragraph gap factor.
    pub fn with_paragraph_gap_factor(mut self, factor: f32) -> Self {
        self.paragraph_gap_factor = factor;
        self
    }

    /// Set the minimum row split gap.
    pub fn with_row_gap_floor(mut self, gap: f32) -> Self {
        self.row_gap_floor = gap;
        self
    }

    /// Gap that splits a row of glyphs of the given size.
    pub fn row_gap_threshold(&self, font_size: f32) -> f32 {
        self.row_gap_floor.max(self.row_gap_factor * font_size)
    }

    /// Smallest accepted average gutter width on a page of this width.
    pub fn min_gutter_width(&self, page_width: f32) -> f32 {
        self.min_column_gap.max(self.relative_column_gap * page_width)
    }

    fn validate(&self) -> Result<()> {
        require_positive("default_font_size", self.default_font_size)?;
        require_positive("row_gap_floor", self.row_gap_floor)?;
        require_positive("row_gap_factor", self.row_gap_factor)?;
        require_positive("column_tolerance", self.column_tolerance)?;
        require_positive("paragraph_gap_factor", self.paragraph_gap_factor)?;
        require_positive("nominal_char_width_ratio", self.nominal_char_width_ratio)?;
        require_positive("candidate_gap_factor", self.candidate_gap_factor)?;
        require_positive("gap_merge_distance", self.gap_merge_distance)?;
        require_positive("min_column_gap", self.min_column_gap)?;
        require_unit_interval("relative_column_gap", self.relative_column_gap)?;
        require_unit_interval("column_coverage_ratio", self.column_coverage_ratio)
    }
}

/// Settings of the text fitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FittingConfig {
    /// Split words wider than the box into hyphenated chunks.
    pub enable_word_breaking: bool,
    /// Even out line lengths after a successful wrap.
    pub rebalance_lines: bool,
    /// Upper bound on wrap attempts.
    pub max_iterations: u32,
    /// Multiplier applied to the font size after each failed attempt.
    pub reduction_factor: f32,
    /// Fraction of the box width a line may occupy.
    pub width_safety_margin: f32,
    /// Line pitch as a multiple of the font size.
    pub line_height_ratio: f32,
    /// Absolute lower bound for the fitted font size.
    pub min_font_size: f32,
    /// Lower bound for the fitted font size relative to the original.
    pub min_font_ratio: f32,
}

impl Default for FittingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FittingConfig {
    /// Create fitter settings with defaults.
    pub fn new() -> Self {
        Self {
            enable_word_breaking: false,
            rebalance_lines: false,
            max_iterations: 10,
            reduction_factor: 0.8,
            width_safety_margin: 0.97,
            line_height_ratio: 1.2,
            min_font_size: 4.0,
            min_font_ratio: 0.3,
        }
    }

    /// Enable hyphenated breaking of overlong words.
    pub fn with_word_breaking(mut self, enable: bool) -> Self {
        self.enable_word_breaking = enable;
        self
    }

    /// Enable line rebalancing.
    pub fn with_rebalance(mut self, enable: bool) -> Self {
        self.rebalance_lines = enable;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the per-iteration size multiplier.
    pub fn with_reduction_factor(mut self, factor: f32) -> Self {
        self.reduction_factor = factor;
        self
    }

    /// Set the default line pitch ratio.
    pub fn with_line_height_ratio(mut self, ratio: f32) -> Self {
        self.line_height_ratio = ratio;
        self
    }

    /// Smallest size the fitter may choose for text originally at `original`.
    pub fn size_floor(&self, original: f32) -> f32 {
        self.min_font_size.max(self.min_font_ratio * original)
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig {
                field: "max_iterations",
                value: 0.0,
            });
        }
        if !(self.reduction_factor > 0.0 && self.reduction_factor < 1.0) {
            return Err(Error::InvalidConfig {
                field: "reduction_factor",
                value: self.reduction_factor,
            });
        }
        require_unit_interval("width_safety_margin", self.width_safety_margin)?;
        require_positive("line_height_ratio", self.line_height_ratio)?;
        require_positive("min_font_size", self.min_font_size)?;
        require_unit_interval("min_font_ratio", self.min_font_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReflowConfig::default();
        assert_eq!(config.layout.default_font_size, 12.0);
        assert_eq!(config.layout.row_gap_threshold(8.0), 20.0);
        assert_eq!(config.layout.row_gap_threshold(14.0), 28.0);
        assert_eq!(config.layout.min_gutter_width(100.0), 10.0);
        assert_eq!(config.layout.min_gutter_width(600.0), 30.0);
        assert!(!config.fitting.enable_word_breaking);
        assert_eq!(config.fitting.size_floor(10.0), 4.0);
        assert_eq!(config.fitting.size_floor(20.0), 6.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ReflowConfig::new()
            .with_layout(LayoutConfig::new().with_column_tolerance(30.0))
            .with_fitting(
                FittingConfig::new()
                    .with_word_breaking(true)
                    .with_max_iterations(3),
            );
        assert_eq!(config.layout.column_tolerance, 30.0);
        assert!(config.fitting.enable_word_breaking);
        assert_eq!(config.fitting.max_iterations, 3);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = ReflowConfig::from_json(r#"{"fitting": {"reduction_factor": 1.2}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "reduction_factor", .. }));

        let err = ReflowConfig::from_json(r#"{"layout": {"column_tolerance": -1}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "column_tolerance", .. }));

        let err = ReflowConfig::from_json(r#"{"fitting": {"max_iterations": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "max_iterations", .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reflow.json");
        std::fs::write(&path, r#"{"fitting": {"rebalance_lines": true}}"#).unwrap();

        let config = ReflowConfig::from_file(&path).unwrap();
        assert!(config.fitting.rebalance_lines);

        let missing = ReflowConfig::from_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
