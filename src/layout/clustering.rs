//! Line clustering: glyphs → rows → horizontal segments.
//!
//! Glyphs are bucketed by their baseline rounded to a tenth of a point. Each
//! row is then read left to right and cut wherever the horizontal gap to the
//! previous glyph exceeds `max(row_gap_floor, row_gap_factor * font_size)`,
//! which separates side-by-side columns sharing a baseline.

use crate::config::LayoutConfig;
use crate::layout::glyph::CharacterGlyph;
use crate::utils::safe_float_cmp;
use std::collections::BTreeMap;

/// A baseline position rounded to 0.1pt, stored as integer tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(i64);

impl RowKey {
    /// Round a `y` coordinate to its row.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::layout::RowKey;
    ///
    /// assert_eq!(RowKey::from_y(700.04), RowKey::from_y(699.96));
    /// assert_ne!(RowKey::from_y(700.0), RowKey::from_y(700.2));
    /// assert_eq!(RowKey::from_y(700.04).y(), 700.0);
    /// ```
    pub fn from_y(y: f32) -> Self {
        Self((y as f64 * 10.0).round() as i64)
    }

    /// The rounded `y` coordinate.
    pub fn y(self) -> f32 {
        (self.0 as f64 / 10.0) as f32
    }
}

/// A contiguous run of glyphs on one row.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    /// Row this segment was cut from
    pub row: RowKey,
    /// Rounded baseline
    pub y_pos: f32,
    /// Glyphs, left to right
    pub chars: Vec<CharacterGlyph>,
    /// Leftmost `x0`
    pub x_start: f32,
    /// Rightmost `x1`
    pub x_end: f32,
    /// Concatenated glyph text
    pub text: String,
}

impl LineSegment {
    /// Build a segment from a non-empty run of glyphs.
    ///
    /// Returns `None` when `chars` is empty.
    pub fn from_chars(row: RowKey, chars: Vec<CharacterGlyph>) -> Option<Self> {
        if chars.is_empty() {
            return None;
        }
        let x_start = chars.iter().map(|c| c.x0).fold(f32::INFINITY, f32::min);
        let x_end = chars.iter().map(|c| c.x1).fold(f32::NEG_INFINITY, f32::max);
        let text: String = chars.iter().map(|c| c.text.as_str()).collect();
        Some(Self {
            row,
            y_pos: row.y(),
            chars,
            x_start,
            x_end,
            text,
        })
    }

    /// Font size of the first glyph.
    pub fn leading_font_size(&self) -> Option<f32> {
        self.chars.first().map(|c| c.font_size)
    }
}

/// Segments grouped by row, ascending by `y`.
pub type LineRows = BTreeMap<RowKey, Vec<LineSegment>>;

/// Split one row (already sorted left to right) into segments.
fn split_row(row: RowKey, chars: Vec<CharacterGlyph>, config: &LayoutConfig) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    let mut current: Vec<CharacterGlyph> = Vec::new();

    for glyph in chars {
        if let Some(prev) = current.last() {
            let gap = glyph.x0 - prev.x1;
            if gap > config.row_gap_threshold(glyph.font_size) {
                segments.extend(LineSegment::from_chars(row, std::mem::take(&mut current)));
            }
        }
        current.push(glyph);
    }
    segments.extend(LineSegment::from_chars(row, current));
    segments
}

/// Cluster glyphs into rows of segments.
pub fn cluster_lines(chars: &[CharacterGlyph], config: &LayoutConfig) -> LineRows {
    let mut by_row: BTreeMap<RowKey, Vec<CharacterGlyph>> = BTreeMap::new();
    for glyph in chars {
        by_row
            .entry(RowKey::from_y(glyph.y0))
            .or_default()
            .push(glyph.clone());
    }
    log::debug!("Found {} distinct rows", by_row.len());

    let rows: LineRows = by_row
        .into_iter()
        .map(|(row, mut glyphs)| {
            glyphs.sort_by(|a, b| safe_float_cmp(a.x0, b.x0));
            (row, split_row(row, glyphs, config))
        })
        .collect();

    log::debug!(
        "Created {} line segments",
        rows.values().map(Vec::len).sum::<usize>()
    );
    rows
}

/// Flatten rows into segments ordered top to bottom, left to right within a row.
pub fn segments_top_to_bottom(rows: LineRows) -> Vec<LineSegment> {
    rows.into_iter().rev().flat_map(|(_, segments)| segments).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    fn mock_char(c: &str, x: f32, y: f32, size: f32) -> CharacterGlyph {
        let width = size * 0.5;
        CharacterGlyph::new(c, BoundingBox::new(x, y, x + width, y + size), "Helvetica", size)
    }

    fn mock_word(text: &str, x: f32, y: f32, size: f32) -> Vec<CharacterGlyph> {
        text.chars()
            .enumerate()
            .map(|(i, c)| mock_char(&c.to_string(), x + i as f32 * size * 0.5, y, size))
            .collect()
    }

    #[test]
    fn test_empty() {
        assert!(cluster_lines(&[], &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_single_row_single_segment() {
        let mut chars = mock_word("Hello", 72.0, 700.0, 12.0);
        chars.extend(mock_word("World", 72.0 + 36.0, 700.0, 12.0)); // 6pt word gap
        let rows = cluster_lines(&chars, &LayoutConfig::default());
        assert_eq!(rows.len(), 1);
        let segments = &rows[&RowKey::from_y(700.0)];
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "HelloWorld");
        assert_eq!(segments[0].x_start, 72.0);
    }

    #[test]
    fn test_unsorted_input_is_read_left_to_right() {
        let mut chars = mock_word("abc", 100.0, 500.0, 10.0);
        chars.reverse();
        let rows = cluster_lines(&chars, &LayoutConfig::default());
        assert_eq!(rows[&RowKey::from_y(500.0)][0].text, "abc");
    }

    #[test]
    fn test_row_split_on_large_gap() {
        let mut chars = mock_word("left", 50.0, 600.0, 10.0); // ends at 70
        chars.extend(mock_word("right", 100.0, 600.0, 10.0)); // gap 30 > max(20, 20)
        let rows = cluster_lines(&chars, &LayoutConfig::default());
        let segments = &rows[&RowKey::from_y(600.0)];
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "left");
        assert_eq!(segments[1].text, "right");
        assert_eq!(segments[1].x_start, 100.0);
        assert_eq!(segments[1].x_end, 125.0);
    }

    #[test]
    fn test_gap_threshold_scales_with_font_size() {
        // 30pt gap is below 2 * 18pt
        let mut chars = mock_word("big", 50.0, 600.0, 18.0);
        chars.extend(mock_word("text", 50.0 + 27.0 + 30.0, 600.0, 18.0));
        let rows = cluster_lines(&chars, &LayoutConfig::default());
        assert_eq!(rows[&RowKey::from_y(600.0)].len(), 1);
    }

    #[test]
    fn test_rows_rounded_to_tenths() {
        let chars = vec![
            mock_char("a", 10.0, 700.01, 10.0),
            mock_char("b", 15.0, 699.98, 10.0),
            mock_char("c", 20.0, 700.3, 10.0),
        ];
        let rows = cluster_lines(&chars, &LayoutConfig::default());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_segments_top_to_bottom() {
        let mut chars = mock_word("low", 50.0, 100.0, 10.0);
        chars.extend(mock_word("high", 50.0, 700.0, 10.0));
        chars.extend(mock_word("mid", 50.0, 400.0, 10.0));
        let segments = segments_top_to_bottom(cluster_lines(&chars, &LayoutConfig::default()));
        let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["high", "mid", "low"]);
    }
}
