//! Per-page layout analysis.

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::layout::clustering::{cluster_lines, segments_top_to_bottom};
use crate::layout::column_assigner::assign_columns;
use crate::layout::column_detector::detect_columns;
use crate::layout::font_metrics::{FontMetricsCollector, FontMetricsMap};
use crate::layout::glyph::{CharacterGlyph, DEFAULT_FONT_SIZE};
use crate::layout::paragraph::{assemble_paragraphs, ParagraphCluster};
use crate::layout::reading_order::ReadingOrderSorter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Glyphs of one page together with the page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Extracted glyphs in any order
    #[serde(default)]
    pub chars: Vec<CharacterGlyph>,
}

impl PageInput {
    /// Create a page.
    pub fn new(width: f32, height: f32, chars: Vec<CharacterGlyph>) -> Self {
        Self {
            width,
            height,
            chars,
        }
    }

    /// Parse a page from JSON and check its dimensions.
    pub fn from_json(json: &str) -> Result<Self> {
        let page: Self = serde_json::from_str(json)?;
        page.validate()?;
        Ok(page)
    }

    /// Reject pages without a usable size.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidPage(format!("width {}", self.width)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidPage(format!("height {}", self.height)));
        }
        Ok(())
    }
}

/// Result of analyzing one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 1-based page number
    pub page_number: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Detected column boundaries, `0` through `width`
    pub column_boundaries: Vec<f32>,
    /// Paragraphs in reading order
    pub paragraphs: Vec<ParagraphCluster>,
    /// Font metrics of this page alone
    pub font_metrics: FontMetricsMap,
    /// Glyphs dropped for invalid geometry
    pub skipped_glyphs: usize,
}

/// Runs the layout stages for a page.
#[derive(Debug, Clone, Default)]
pub struct PageAnalyzer {
    config: LayoutConfig,
}

impl PageAnalyzer {
    /// Create an analyzer with the given thresholds.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Analyze one page.
    pub fn analyze(&self, page: &PageInput, page_number: usize) -> PageLayout {
        let glyphs = prepare_glyphs(&page.chars, self.config.default_font_size);
        let skipped_glyphs = page.chars.len() - glyphs.len();
        if skipped_glyphs > 0 {
            log::warn!(
                "Page {}: skipped {} glyphs with invalid geometry",
                page_number,
                skipped_glyphs
            );
        }

        let font_metrics = FontMetricsCollector::collect(&glyphs);
        let column_boundaries = detect_columns(&glyphs, page.width, &self.config);

        let segments = segments_top_to_bottom(cluster_lines(&glyphs, &self.config));
        let columns = assign_columns(segments, self.config.column_tolerance);

        let mut paragraphs: Vec<ParagraphCluster> = columns
            .into_iter()
            .enumerate()
            .flat_map(|(index, bucket)| {
                assemble_paragraphs(index, bucket.segments, self.config.paragraph_gap_factor)
            })
            .collect();
        ReadingOrderSorter::new(page.height).sort(&mut paragraphs);

        log::debug!(
            "Page {}: {} glyphs, {} column boundaries, {} paragraphs",
            page_number,
            glyphs.len(),
            column_boundaries.len(),
            paragraphs.len()
        );

        PageLayout {
            page_number,
            width: page.width,
            height: page.height,
            column_boundaries,
            paragraphs,
            font_metrics,
            skipped_glyphs,
        }
    }
}

/// Drop glyphs with invalid geometry and give size-less glyphs the
/// configured default size.
fn prepare_glyphs(chars: &[CharacterGlyph], default_font_size: f32) -> Cow<'_, [CharacterGlyph]> {
    let resize = default_font_size != DEFAULT_FONT_SIZE;
    let untouched = chars
        .iter()
        .all(|c| c.validate().is_ok() && (!resize || c.has_reported_size()));
    if untouched {
        return Cow::Borrowed(chars);
    }
    Cow::Owned(
        chars
            .iter()
            .filter(|c| match c.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::debug!("Skipping glyph: {}", e);
                    false
                },
            })
            .map(|c| c.clone().with_default_size(default_font_size))
            .collect(),
    )
}
