//! Representative character widths per font variant.
//!
//! A font variant is a font name at one size. For each variant we buffer the
//! measured widths of the first plausible glyphs and, once enough are seen,
//! freeze their median as the variant's standard character width. The
//! fitter uses that width in preference to its static estimate.
//!
//! A frozen width is never replaced, neither by later glyphs nor by merging
//! metrics from other pages.

use crate::layout::glyph::CharacterGlyph;
use crate::utils::safe_float_cmp;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest plausible glyph width relative to the font size.
pub const MIN_WIDTH_RATIO: f32 = 0.2;
/// Largest plausible glyph width relative to the font size.
pub const MAX_WIDTH_RATIO: f32 = 1.2;
/// Samples needed before the median is frozen.
pub const SAMPLES_TO_FREEZE: usize = 5;
/// Upper bound on buffered samples per variant.
pub const MAX_SAMPLES: usize = 10;

/// Identity of a font variant: `"<font_name>_<font_size>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontVariantKey(String);

impl FontVariantKey {
    /// Build the key for a font name at a size.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::layout::FontVariantKey;
    ///
    /// assert_eq!(FontVariantKey::new("Helvetica", 12.0).as_str(), "Helvetica_12");
    /// assert_eq!(FontVariantKey::new("Times-Bold", 10.5).as_str(), "Times-Bold_10.5");
    /// ```
    pub fn new(font_name: &str, font_size: f32) -> Self {
        Self(format!("{}_{}", font_name, font_size))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FontVariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Width statistics for one font variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Font name
    pub font_name: String,
    /// Font size the widths were measured at
    pub font_size: f32,
    /// Frozen median glyph width, once enough samples were seen
    pub standard_char_width: Option<f32>,
    /// Number of non-whitespace glyphs observed
    pub sample_count: usize,
    #[serde(skip)]
    samples: Vec<f32>,
}

impl FontMetrics {
    /// Empty metrics for a variant.
    pub fn new(font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_name: font_name.into(),
            font_size,
            standard_char_width: None,
            sample_count: 0,
            samples: Vec::new(),
        }
    }

    /// Whether the standard width has been fixed.
    pub fn is_frozen(&self) -> bool {
        self.standard_char_width.is_some()
    }

    /// Widths buffered but not yet frozen.
    pub fn pending_samples(&self) -> &[f32] {
        &self.samples
    }

    /// Account for one glyph of this variant.
    pub fn observe(&mut self, glyph: &CharacterGlyph) {
        if glyph.is_whitespace() {
            return;
        }
        if !self.is_frozen() && self.samples.len() < MAX_SAMPLES {
            let width = glyph.width();
            let plausible = self.font_size * MIN_WIDTH_RATIO..=self.font_size * MAX_WIDTH_RATIO;
            if plausible.contains(&width) {
                self.samples.push(width);
                self.freeze_if_ready();
            }
        }
        self.sample_count += 1;
    }

    /// Standard width rescaled to another font size.
    pub fn scaled_char_width(&self, font_size: f32) -> Option<f32> {
        let width = self.standard_char_width?;
        if self.font_size > 0.0 {
            Some(width * font_size / self.font_size)
        } else {
            None
        }
    }

    /// Fold another page's metrics for the same variant into this one.
    pub fn merge_from(&mut self, other: &FontMetrics) {
        self.sample_count += other.sample_count;
        if self.is_frozen() {
            return;
        }
        if let Some(width) = other.standard_char_width {
            self.standard_char_width = Some(width);
            self.samples.clear();
            return;
        }
        let room = MAX_SAMPLES.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.iter().copied().take(room));
        self.freeze_if_ready();
    }

    fn freeze_if_ready(&mut self) {
        if self.samples.len() < SAMPLES_TO_FREEZE {
            return;
        }
        let mut widths = self.samples.clone();
        widths.sort_by(|a, b| safe_float_cmp(*a, *b));
        let median = widths[widths.len() / 2];
        log::debug!(
            "Captured standard char width for {}_{}: {:.3}pt (median of {} samples)",
            self.font_name,
            self.font_size,
            median,
            widths.len()
        );
        self.standard_char_width = Some(median);
        self.samples.clear();
    }
}

/// Font metrics keyed by variant, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontMetricsMap {
    entries: IndexMap<FontVariantKey, FontMetrics>,
}

impl FontMetricsMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no variant was seen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Metrics for a key.
    pub fn get(&self, key: &FontVariantKey) -> Option<&FontMetrics> {
        self.entries.get(key)
    }

    /// Metrics for a font name at a size.
    pub fn lookup(&self, font_name: &str, font_size: f32) -> Option<&FontMetrics> {
        self.get(&FontVariantKey::new(font_name, font_size))
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&FontVariantKey, &FontMetrics)> {
        self.entries.iter()
    }

    /// Number of variants with a frozen width.
    pub fn frozen_count(&self) -> usize {
        self.entries.values().filter(|m| m.is_frozen()).count()
    }

    fn entry_for(&mut self, glyph: &CharacterGlyph) -> &mut FontMetrics {
        self.entries
            .entry(FontVariantKey::new(&glyph.font_name, glyph.font_size))
            .or_insert_with(|| FontMetrics::new(glyph.font_name.clone(), glyph.font_size))
    }

    /// Fold another map into this one, preserving frozen widths.
    pub fn merge(&mut self, other: &FontMetricsMap) {
        for (key, incoming) in other.iter() {
            match self.entries.get_mut(key) {
                Some(existing) => existing.merge_from(incoming),
                None => {
                    self.entries.insert(key.clone(), incoming.clone());
                },
            }
        }
    }
}

/// Incremental collector of [`FontMetrics`].
///
/// # Examples
///
/// ```
/// use pdf_reflow::geometry::BoundingBox;
/// use pdf_reflow::layout::{CharacterGlyph, FontMetricsCollector};
///
/// let glyphs: Vec<CharacterGlyph> = (0..6)
///     .map(|i| {
///         let x = i as f32 * 7.0;
///         CharacterGlyph::new("a", BoundingBox::new(x, 0.0, x + 6.0, 12.0), "Helvetica", 12.0)
///     })
///     .collect();
///
/// let metrics = FontMetricsCollector::collect(&glyphs);
/// let m = metrics.lookup("Helvetica", 12.0).unwrap();
/// assert_eq!(m.standard_char_width, Some(6.0));
/// assert_eq!(m.sample_count, 6);
/// ```
#[derive(Debug, Default)]
pub struct FontMetricsCollector {
    metrics: FontMetricsMap,
}

impl FontMetricsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one glyph.
    pub fn observe(&mut self, glyph: &CharacterGlyph) {
        self.metrics.entry_for(glyph).observe(glyph);
    }

    /// Account for a sequence of glyphs.
    pub fn observe_all<'a, I>(&mut self, glyphs: I)
    where
        I: IntoIterator<Item = &'a CharacterGlyph>,
    {
        for glyph in glyphs {
            self.observe(glyph);
        }
    }

    /// Finish collection.
    pub fn finish(self) -> FontMetricsMap {
        for (key, m) in self.metrics.iter() {
            match m.standard_char_width {
                Some(w) => log::debug!("Font {}: {:.3}pt over {} glyphs", key, w, m.sample_count),
                None => log::debug!(
                    "Font {}: no standard width ({} pending samples)",
                    key,
                    m.pending_samples().len()
                ),
            }
        }
        self.metrics
    }

    /// Collect metrics for a slice of glyphs in one go.
    pub fn collect(glyphs: &[CharacterGlyph]) -> FontMetricsMap {
        let mut collector = Self::new();
        collector.observe_all(glyphs);
        collector.finish()
    }
}
