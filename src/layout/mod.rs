//! Page layout reconstruction from positioned glyphs.
//!
//! The stages run per page in this order:
//! - font metrics collection (measured character widths per font variant)
//! - column boundary detection from vertical gutters
//! - line clustering (rows split into segments at large gaps)
//! - column assignment of segments by left edge
//! - paragraph assembly within each column
//! - reading order sort across columns
//!
//! [`PageAnalyzer`] drives them for one page.

pub mod clustering;
pub mod column_assigner;
pub mod column_detector;
pub mod font_metrics;
pub mod glyph;
pub mod page;
pub mod paragraph;
pub mod reading_order;

// Re-export main types
pub use clustering::{cluster_lines, segments_top_to_bottom, LineRows, LineSegment, RowKey};
pub use column_assigner::{assign_columns, ColumnBucket};
pub use column_detector::{detect_columns, find_gap_candidates, group_gaps, GapCandidate, GapGroup};
pub use font_metrics::{FontMetrics, FontMetricsCollector, FontMetricsMap, FontVariantKey};
pub use glyph::{CharacterGlyph, Color, ColorSpec};
pub use page::{PageAnalyzer, PageInput, PageLayout};
pub use paragraph::{assemble_paragraphs, ParagraphCluster};
pub use reading_order::{reading_order_score, HasCenter, ReadingOrderSorter};
