//! Paragraph assembly within a column.
//!
//! Segments of one column are read top to bottom. A vertical step larger
//! than `paragraph_gap_factor` times the font size of the incoming segment
//! closes the current paragraph.

use crate::geometry::{BoundingBox, Point};
use crate::layout::clustering::{LineSegment, RowKey};
use crate::layout::glyph::ColorSpec;
use crate::utils::safe_float_cmp;
use std::collections::BTreeSet;

/// A paragraph reconstructed from line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphCluster {
    /// Member segments, top to bottom
    pub segments: Vec<LineSegment>,
    /// Union of all glyph boxes
    pub bounding_box: BoundingBox,
    /// Font of the first glyph
    pub font_name: String,
    /// Size of the first glyph
    pub font_size: f32,
    /// Fill color of the first glyph
    pub fill_color: ColorSpec,
    /// Stroke color of the first glyph
    pub stroke_color: ColorSpec,
    /// Index of the column bucket, left to right
    pub column_index: usize,
    /// Number of distinct rows spanned
    pub distinct_line_count: usize,
    /// Segment texts joined with single spaces
    pub text: String,
}

impl ParagraphCluster {
    /// Build a paragraph from segments already in top-to-bottom order.
    ///
    /// Returns `None` when there are no glyphs.
    pub fn from_segments(column_index: usize, segments: Vec<LineSegment>) -> Option<Self> {
        let first = segments.first()?.chars.first()?;
        let font_name = first.font_name.clone();
        let font_size = first.font_size;
        let fill_color = first.fill_color.clone();
        let stroke_color = first.stroke_color.clone();

        let bounding_box = BoundingBox::enclosing(
            segments
                .iter()
                .flat_map(|s| s.chars.iter().map(|c| c.bbox())),
        )?;
        let distinct_line_count = segments
            .iter()
            .map(|s| s.row)
            .collect::<BTreeSet<RowKey>>()
            .len();
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            segments,
            bounding_box,
            font_name,
            font_size,
            fill_color,
            stroke_color,
            column_index,
            distinct_line_count,
            text,
        })
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        self.bounding_box.center()
    }
}

/// Assemble the paragraphs of one column.
///
/// Paragraphs whose text is blank are dropped.
pub fn assemble_paragraphs(
    column_index: usize,
    mut segments: Vec<LineSegment>,
    paragraph_gap_factor: f32,
) -> Vec<ParagraphCluster> {
    // Stable: segments sharing a row keep their left-to-right order.
    segments.sort_by(|a, b| safe_float_cmp(b.y_pos, a.y_pos));

    let mut groups: Vec<Vec<LineSegment>> = Vec::new();
    for segment in segments {
        let threshold = segment.leading_font_size().unwrap_or(0.0) * paragraph_gap_factor;
        match groups.last_mut() {
            Some(current)
                if current
                    .last()
                    .is_some_and(|prev| (prev.y_pos - segment.y_pos).abs() <= threshold) =>
            {
                current.push(segment);
            },
            _ => groups.push(vec![segment]),
        }
    }

    let paragraphs: Vec<ParagraphCluster> = groups
        .into_iter()
        .filter_map(|group| ParagraphCluster::from_segments(column_index, group))
        .filter(|p| !p.text.trim().is_empty())
        .collect();

    log::debug!(
        "Column {}: {} paragraphs",
        column_index,
        paragraphs.len()
    );
    paragraphs
}
