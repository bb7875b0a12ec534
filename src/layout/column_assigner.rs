//! Assignment of line segments to columns.
//!
//! Segments are visited top to bottom. A segment joins the first existing
//! bucket whose key lies within the tolerance of its left edge; otherwise it
//! opens a new bucket keyed by its own `x_start`. Buckets are never re-keyed,
//! so the outcome depends on visiting order.

use crate::layout::clustering::LineSegment;
use crate::utils::safe_float_cmp;

/// Segments sharing a left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBucket {
    /// `x_start` of the segment that opened the bucket
    pub column_x: f32,
    /// Member segments in visiting order
    pub segments: Vec<LineSegment>,
}

/// Group segments into columns, returned left to right.
///
/// # Examples
///
/// ```
/// use pdf_reflow::config::LayoutConfig;
/// use pdf_reflow::geometry::BoundingBox;
/// use pdf_reflow::layout::{assign_columns, cluster_lines, segments_top_to_bottom, CharacterGlyph};
///
/// let glyph = |x: f32, y: f32| {
///     CharacterGlyph::new("a", BoundingBox::new(x, y, x + 6.0, y + 10.0), "Helvetica", 10.0)
/// };
/// let chars = vec![glyph(300.0, 700.0), glyph(50.0, 700.0), glyph(80.0, 686.0)];
///
/// let segments = segments_top_to_bottom(cluster_lines(&chars, &LayoutConfig::default()));
/// let columns = assign_columns(segments, 50.0);
/// assert_eq!(columns.len(), 2);
/// assert_eq!(columns[0].column_x, 50.0);
/// assert_eq!(columns[0].segments.len(), 2);
/// assert_eq!(columns[1].column_x, 300.0);
/// ```
pub fn assign_columns<I>(segments: I, tolerance: f32) -> Vec<ColumnBucket>
where
    I: IntoIterator<Item = LineSegment>,
{
    let mut buckets: Vec<ColumnBucket> = Vec::new();

    for segment in segments {
        match buckets
            .iter_mut()
            .find(|b| (segment.x_start - b.column_x).abs() < tolerance)
        {
            Some(bucket) => bucket.segments.push(segment),
            None => buckets.push(ColumnBucket {
                column_x: segment.x_start,
                segments: vec![segment],
            }),
        }
    }

    buckets.sort_by(|a, b| safe_float_cmp(a.column_x, b.column_x));
    log::debug!(
        "Detected {} columns at x-positions: {:?}",
        buckets.len(),
        buckets
            .iter()
            .map(|b| format!("{:.1}", b.column_x))
            .collect::<Vec<_>>()
    );
    buckets
}
