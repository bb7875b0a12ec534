//! Column boundary detection from horizontal gaps.
//!
//! Glyphs are scanned left to right by `x0`; every gap noticeably wider than
//! a nominal character advance becomes a candidate gutter. Candidates that
//! line up horizontally are grouped, and a group is accepted as a column
//! separator when its gaps are wide on average and the group spans a
//! meaningful part of the content height.

use crate::config::LayoutConfig;
use crate::layout::glyph::CharacterGlyph;
use crate::utils::safe_float_cmp;

/// A single gap between horizontally adjacent glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapCandidate {
    /// Midpoint of the gap
    pub midpoint: f32,
    /// Gap width
    pub size: f32,
    /// Lowest `y0` of the two glyphs
    pub y_min: f32,
    /// Highest `y1` of the two glyphs
    pub y_max: f32,
}

/// A run of candidates sharing roughly the same midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GapGroup {
    /// Member gaps, sorted by midpoint
    pub gaps: Vec<GapCandidate>,
}

impl GapGroup {
    /// Average midpoint.
    pub fn position(&self) -> f32 {
        self.gaps.iter().map(|g| g.midpoint).sum::<f32>() / self.gaps.len() as f32
    }

    /// Average gap width.
    pub fn average_size(&self) -> f32 {
        self.gaps.iter().map(|g| g.size).sum::<f32>() / self.gaps.len() as f32
    }

    /// Vertical extent covered by the member gaps.
    pub fn vertical_coverage(&self) -> f32 {
        let low = self.gaps.iter().map(|g| g.y_min).fold(f32::INFINITY, f32::min);
        let high = self
            .gaps
            .iter()
            .map(|g| g.y_max)
            .fold(f32::NEG_INFINITY, f32::max);
        high - low
    }
}

/// Find gaps between `x0`-adjacent glyphs wider than the candidate threshold.
pub fn find_gap_candidates(chars: &[CharacterGlyph], config: &LayoutConfig) -> Vec<GapCandidate> {
    let mut sorted: Vec<&CharacterGlyph> = chars.iter().collect();
    sorted.sort_by(|a, b| safe_float_cmp(a.x0, b.x0));

    sorted
        .windows(2)
        .filter_map(|pair| {
            let (prev, next) = (pair[0], pair[1]);
            let gap = next.x0 - prev.x1;
            let threshold =
                config.candidate_gap_factor * config.nominal_char_width_ratio * prev.font_size;
            (gap > threshold).then(|| GapCandidate {
                midpoint: (prev.x1 + next.x0) / 2.0,
                size: gap,
                y_min: prev.y0.min(next.y0),
                y_max: prev.y1.max(next.y1),
            })
        })
        .collect()
}

/// Group candidates whose midpoints are within the merge distance of the
/// previous member.
pub fn group_gaps(mut candidates: Vec<GapCandidate>, merge_distance: f32) -> Vec<GapGroup> {
    candidates.sort_by(|a, b| safe_float_cmp(a.midpoint, b.midpoint));

    let mut groups: Vec<GapGroup> = Vec::new();
    for gap in candidates {
        match groups.last_mut() {
            Some(group)
                if group
                    .gaps
                    .last()
                    .is_some_and(|last| (gap.midpoint - last.midpoint).abs() < merge_distance) =>
            {
                group.gaps.push(gap);
            },
            _ => groups.push(GapGroup { gaps: vec![gap] }),
        }
    }
    groups
}

/// Detect column boundaries on a page.
///
/// The result always starts with `0`, ends with `page_width`, has at least
/// two entries and is non-decreasing.
///
/// # Examples
///
/// ```
/// use pdf_reflow::config::LayoutConfig;
/// use pdf_reflow::geometry::BoundingBox;
/// use pdf_reflow::layout::{detect_columns, CharacterGlyph};
///
/// let glyph = |x: f32| {
///     CharacterGlyph::new("a", BoundingBox::new(x, 700.0, x + 6.0, 712.0), "Helvetica", 12.0)
/// };
/// let (left, right) = (glyph(0.0), glyph(86.0));
///
/// let boundaries = detect_columns(&[left, right], 600.0, &LayoutConfig::default());
/// assert_eq!(boundaries, vec![0.0, 46.0, 600.0]);
/// ```
pub fn detect_columns(
    chars: &[CharacterGlyph],
    page_width: f32,
    config: &LayoutConfig,
) -> Vec<f32> {
    let page_width = if page_width.is_finite() {
        page_width.max(0.0)
    } else {
        0.0
    };
    if chars.is_empty() {
        return vec![0.0, page_width];
    }

    let candidates = find_gap_candidates(chars, config);
    if candidates.is_empty() {
        log::debug!("No significant gaps found - treating as single column");
        return vec![0.0, page_width];
    }

    let content_low = chars.iter().map(|c| c.y0).fold(f32::INFINITY, f32::min);
    let content_high = chars.iter().map(|c| c.y1).fold(f32::NEG_INFINITY, f32::max);
    let content_height = content_high - content_low;
    let min_gutter = config.min_gutter_width(page_width);
    let min_coverage = content_height * config.column_coverage_ratio;

    let groups = group_gaps(candidates, config.gap_merge_distance);
    log::debug!("Column detection: {} gap groups", groups.len());

    let mut separators: Vec<f32> = groups
        .iter()
        .filter(|group| {
            let accepted =
                group.average_size() > min_gutter && group.vertical_coverage() > min_coverage;
            if accepted {
                log::debug!(
                    "  Column gap at x={:.1}: avg size {:.1}, coverage {:.1}",
                    group.position(),
                    group.average_size(),
                    group.vertical_coverage()
                );
            }
            accepted
        })
        .map(|group| group.position().clamp(0.0, page_width))
        .collect();
    separators.sort_by(|a, b| safe_float_cmp(*a, *b));

    let mut boundaries = Vec::with_capacity(separators.len() + 2);
    boundaries.push(0.0);
    boundaries.extend(separators);
    boundaries.push(page_width);

    log::debug!("Column boundaries: {:?}", boundaries);
    boundaries
}
