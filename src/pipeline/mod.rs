//! Document-level layout and fitting.
//!
//! ```text
//! PageInput[]
//!     ↓
//! [PageAnalyzer] per page (optionally in parallel)
//!     ↓
//! RawParagraph[] + FontMetricsMap (merged in page order)
//!     ↓
//! external translation
//!     ↓
//! TranslatedParagraph[]
//!     ↓
//! [FontRegistry] + [TextFitter]
//!     ↓
//! FittedParagraph[] → external renderer
//! ```

pub mod records;

pub use records::{FittedParagraph, RawParagraph, TranslatedParagraph};

use crate::config::ReflowConfig;
use crate::fitting::{FitRequest, StandardWidth, TextFitter};
use crate::fonts::FontRegistry;
use crate::layout::{FontMetricsMap, PageAnalyzer, PageInput, PageLayout};
use serde::{Deserialize, Serialize};

/// Paragraphs and font metrics of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Paragraphs, page by page, each page in reading order
    pub paragraphs: Vec<RawParagraph>,
    /// Font metrics merged across pages
    pub font_metrics: FontMetricsMap,
    /// Column boundaries detected on each page
    #[serde(default)]
    pub column_boundaries: Vec<Vec<f32>>,
    /// Glyphs dropped for invalid geometry
    #[serde(default)]
    pub skipped_glyphs: usize,
}

impl DocumentLayout {
    /// Paragraphs of one 1-based page.
    pub fn page_paragraphs(&self, page_number: usize) -> impl Iterator<Item = &RawParagraph> {
        self.paragraphs
            .iter()
            .filter(move |p| p.page_number == page_number)
    }
}

/// Runs layout analysis over documents and fits translations back in.
#[derive(Debug, Clone)]
pub struct ReflowPipeline {
    config: ReflowConfig,
    analyzer: PageAnalyzer,
    fitter: TextFitter,
}

impl ReflowPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReflowConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: ReflowConfig) -> Self {
        Self {
            analyzer: PageAnalyzer::new(config.layout.clone()),
            fitter: TextFitter::new(config.fitting.clone()),
            config,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    /// Analyze a single page.
    pub fn analyze_page(&self, page: &PageInput, page_number: usize) -> PageLayout {
        self.analyzer.analyze(page, page_number)
    }

    /// Analyze every page and collect paragraphs and metrics.
    ///
    /// Page metrics are merged in page order, so the result does not depend
    /// on whether pages were analyzed in parallel.
    pub fn analyze_document(&self, pages: &[PageInput]) -> DocumentLayout {
        let layouts = self.analyze_pages(pages);

        let mut document = DocumentLayout::default();
        for layout in layouts {
            document.font_metrics.merge(&layout.font_metrics);
            document.skipped_glyphs += layout.skipped_glyphs;
            document.paragraphs.extend(
                layout
                    .paragraphs
                    .iter()
                    .map(|cluster| RawParagraph::from_cluster(cluster, layout.page_number)),
            );
            document.column_boundaries.push(layout.column_boundaries);
        }

        log::info!(
            "Extracted {} paragraphs from {} pages",
            document.paragraphs.len(),
            pages.len()
        );
        log::info!(
            "Collected font metrics for {} font variants ({} measured)",
            document.font_metrics.len(),
            document.font_metrics.frozen_count()
        );
        document
    }

    #[cfg(feature = "parallel")]
    fn analyze_pages(&self, pages: &[PageInput]) -> Vec<PageLayout> {
        use rayon::prelude::*;

        pages
            .par_iter()
            .enumerate()
            .map(|(index, page)| self.analyzer.analyze(page, index + 1))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_pages(&self, pages: &[PageInput]) -> Vec<PageLayout> {
        pages
            .iter()
            .enumerate()
            .map(|(index, page)| self.analyzer.analyze(page, index + 1))
            .collect()
    }

    /// Fit one translated paragraph into its source box.
    ///
    /// Paragraphs with blank text or a degenerate box pass through as
    /// `not_fitted`.
    pub fn fit_paragraph(
        &self,
        translated: TranslatedParagraph,
        metrics: &FontMetricsMap,
        registry: &mut FontRegistry,
    ) -> FittedParagraph {
        let source = &translated.paragraph;
        let font = registry.resolve(&source.font_name, &translated.target_language);

        if source.text.trim().is_empty() || source.bounding_box.is_degenerate() {
            log::debug!(
                "Page {}: paragraph not fitted (empty text or box)",
                source.page_number
            );
            return FittedParagraph::not_fitted(translated, font);
        }

        // Widths measured on the source font do not carry over to CJK faces.
        let standard_width = if font.class().is_cjk() {
            None
        } else {
            metrics
                .lookup(&source.font_name, source.font_size)
                .and_then(|m| {
                    m.standard_char_width
                        .map(|width| StandardWidth::new(width, m.font_size))
                })
        };

        let request = FitRequest::new(
            &source.text,
            source.bounding_box.width(),
            source.bounding_box.height(),
            source.font_size,
        )
        .with_font(font.class(), font.style())
        .with_target_lines(source.num_lines)
        .with_standard_width(standard_width);

        let result = self.fitter.fit(&request);
        log::debug!(
            "Page {}: fitted with {} ({} lines at {:.2}pt)",
            source.page_number,
            result.fit_method,
            result.line_count(),
            result.scaled_font_size
        );
        FittedParagraph::new(translated, result, font)
    }

    /// Fit every translated paragraph, one output per input.
    pub fn fit_paragraphs(
        &self,
        translated: Vec<TranslatedParagraph>,
        metrics: &FontMetricsMap,
        registry: &mut FontRegistry,
    ) -> Vec<FittedParagraph> {
        let fitted: Vec<FittedParagraph> = translated
            .into_iter()
            .map(|paragraph| self.fit_paragraph(paragraph, metrics, registry))
            .collect();

        let truncated = fitted.iter().filter(|p| p.is_truncated).count();
        if truncated > 0 {
            log::warn!("{} of {} paragraphs overflow their boxes", truncated, fitted.len());
        }
        log::info!("Fitted {} paragraphs", fitted.len());
        fitted
    }
}

impl Default for ReflowPipeline {
    fn default() -> Self {
        Self::new()
    }
}
