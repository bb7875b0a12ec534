//! Reading order by a linear sort key.
//!
//! Every paragraph gets `score = (page_height - cy) * 1000 + cx` where `cx`
//! is its horizontal center and `cy` its vertical center measured downward
//! from the top edge of the page. Paragraphs are sorted by descending score
//! with a stable sort, so rows dominate and exact ties keep their order.
//!
//! Within one row the horizontal term favours the right-hand item; columns
//! whose paragraphs start at different heights are ordered by height alone.

use crate::geometry::Point;
use crate::layout::paragraph::ParagraphCluster;
use std::cmp::Ordering;

/// Weight of the vertical component of the score.
pub const ROW_WEIGHT: f64 = 1000.0;

/// Anything with a center in PDF page space.
pub trait HasCenter {
    /// Center point, `y` growing upward.
    fn center(&self) -> Point;
}

impl HasCenter for ParagraphCluster {
    fn center(&self) -> Point {
        self.bounding_box.center()
    }
}

/// Reading order score for a center given in top-down coordinates.
///
/// Higher scores are read first. On the same row the item further right
/// scores higher, so a right column that starts level with the left one is
/// read before it.
///
/// # Examples
///
/// ```
/// use pdf_reflow::layout::reading_order_score;
///
/// // 100pt from the top of a 792pt page, 50pt from the left
/// assert_eq!(reading_order_score(50.0, 100.0, 792.0), 692_050.0);
///
/// // same row: right beats left
/// assert!(reading_order_score(400.0, 100.0, 792.0) > reading_order_score(100.0, 100.0, 792.0));
/// ```
pub fn reading_order_score(cx: f32, cy: f32, page_height: f32) -> f64 {
    (page_height as f64 - cy as f64) * ROW_WEIGHT + cx as f64
}

/// Sorts items of one page into reading order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingOrderSorter {
    page_height: f32,
}

impl ReadingOrderSorter {
    /// Create a sorter for a page of the given height.
    pub fn new(page_height: f32) -> Self {
        Self { page_height }
    }

    /// Score of an item whose center is in PDF space.
    pub fn score<T: HasCenter>(&self, item: &T) -> f64 {
        let center = item.center();
        let cy_from_top = self.page_height - center.y;
        reading_order_score(center.x, cy_from_top, self.page_height)
    }

    /// Sort by descending score; equal scores keep their relative order.
    pub fn sort<T: HasCenter>(&self, items: &mut [T]) {
        items.sort_by(|a, b| {
            self.score(b)
                .partial_cmp(&self.score(a))
                .unwrap_or(Ordering::Equal)
        });
    }
}
