//! Integration tests for page layout analysis.
//!
//! Pages are built from mock glyphs laid out the way an extractor reports
//! them: one box per character, `y` growing upward.

use pdf_reflow::config::LayoutConfig;
use pdf_reflow::geometry::BoundingBox;
use pdf_reflow::layout::{
    assign_columns, cluster_lines, detect_columns, segments_top_to_bottom, CharacterGlyph, Color,
    ColorSpec, FontMetricsCollector, PageAnalyzer, PageInput,
};
use pdf_reflow::pipeline::ReflowPipeline;
use pdf_reflow::{FitMethod, FontRegistry};

// ============================================================================
// Helper Functions for Creating Mock Data
// ============================================================================

/// Create a mock character with a 0.5 em advance.
fn mock_char(c: char, x: f32, y: f32, size: f32) -> CharacterGlyph {
    CharacterGlyph::new(
        c.to_string(),
        BoundingBox::new(x, y, x + size * 0.5, y + size),
        "Helvetica",
        size,
    )
}

/// Create the glyphs of a line of text starting at `(x, y)`.
fn mock_line(text: &str, x: f32, y: f32, size: f32) -> Vec<CharacterGlyph> {
    text.chars()
        .enumerate()
        .map(|(i, c)| mock_char(c, x + i as f32 * size * 0.5, y, size))
        .collect()
}

/// Two columns of `rows` lines each, 14pt apart, starting at y = 700.
fn two_column_page(rows: usize) -> Vec<CharacterGlyph> {
    let mut chars = Vec::new();
    for row in 0..rows {
        let y = 700.0 - row as f32 * 14.0;
        chars.extend(mock_line("left column body", 50.0, y, 10.0));
        chars.extend(mock_line("right column body", 330.0, y, 10.0));
    }
    chars
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_hello_world_single_paragraph() {
    let chars = mock_line("Hello World", 72.0, 700.0, 12.0);
    let layout = PageAnalyzer::default().analyze(&PageInput::new(612.0, 792.0, chars), 1);

    assert_eq!(layout.paragraphs.len(), 1);
    let paragraph = &layout.paragraphs[0];
    assert_eq!(paragraph.text, "Hello World");
    assert_eq!(paragraph.distinct_line_count, 1);
    assert_eq!(paragraph.segments.len(), 1);
    assert_eq!(paragraph.font_size, 12.0);

    let pipeline = ReflowPipeline::new();
    let document = pipeline.analyze_document(&[PageInput::new(
        612.0,
        792.0,
        mock_line("Hello World", 72.0, 700.0, 12.0),
    )]);
    let translated = document.paragraphs[0].clone().translate("Hello World", "en");
    let fitted = pipeline.fit_paragraphs(
        vec![translated],
        &document.font_metrics,
        &mut FontRegistry::new(),
    );
    assert_eq!(fitted[0].fit_method, FitMethod::SingleLine);
    assert_eq!(fitted[0].fitted_lines, vec!["Hello World"]);
}

#[test]
fn test_gap_between_two_glyphs_is_column_boundary() {
    let chars = vec![mock_char('a', 0.0, 700.0, 12.0), mock_char('b', 86.0, 700.0, 12.0)];
    let boundaries = detect_columns(&chars, 600.0, &LayoutConfig::default());

    assert_eq!(boundaries.len(), 3);
    assert_eq!(boundaries[0], 0.0);
    assert!(boundaries[1] >= 40.0 && boundaries[1] <= 50.0);
    assert_eq!(boundaries[2], 600.0);
}

#[test]
fn test_two_column_boundaries() {
    let boundaries = detect_columns(&two_column_page(10), 612.0, &LayoutConfig::default());
    assert_eq!(boundaries.len(), 3);
    // left column ends at 50 + 16 * 5 = 130, right starts at 330
    assert_eq!(boundaries[1], 230.0);
}

#[test]
fn test_narrow_word_gaps_are_not_columns() {
    let chars = mock_line("plain text with ordinary spacing", 72.0, 700.0, 12.0);
    let boundaries = detect_columns(&chars, 612.0, &LayoutConfig::default());
    assert_eq!(boundaries, vec![0.0, 612.0]);
}

// ============================================================================
// Stage Composition
// ============================================================================

#[test]
fn test_rows_split_into_segments_at_gutter() {
    let rows = cluster_lines(&two_column_page(3), &LayoutConfig::default());
    assert_eq!(rows.len(), 3);
    for segments in rows.values() {
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "left column body");
        assert_eq!(segments[1].text, "right column body");
    }
}

#[test]
fn test_columns_assigned_by_left_edge() {
    let config = LayoutConfig::default();
    let segments = segments_top_to_bottom(cluster_lines(&two_column_page(4), &config));
    let buckets = assign_columns(segments, config.column_tolerance);

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].column_x, 50.0);
    assert_eq!(buckets[1].column_x, 330.0);
    assert!(buckets.iter().all(|b| b.segments.len() == 4));
}

#[test]
fn test_paragraph_break_on_large_gap() {
    let mut chars = Vec::new();
    chars.extend(mock_line("first paragraph line one", 72.0, 700.0, 10.0));
    chars.extend(mock_line("first paragraph line two", 72.0, 688.0, 10.0));
    // 40pt step, above 1.5 * 10
    chars.extend(mock_line("second paragraph", 72.0, 648.0, 10.0));

    let layout = PageAnalyzer::default().analyze(&PageInput::new(612.0, 792.0, chars), 1);
    assert_eq!(layout.paragraphs.len(), 2);
    assert_eq!(
        layout.paragraphs[0].text,
        "first paragraph line one first paragraph line two"
    );
    assert_eq!(layout.paragraphs[0].distinct_line_count, 2);
    assert_eq!(layout.paragraphs[1].text, "second paragraph");
}

#[test]
fn test_reading_order_top_down() {
    let mut chars = Vec::new();
    chars.extend(mock_line("bottom", 72.0, 100.0, 10.0));
    chars.extend(mock_line("top", 72.0, 700.0, 10.0));
    chars.extend(mock_line("middle", 72.0, 400.0, 10.0));

    let layout = PageAnalyzer::default().analyze(&PageInput::new(612.0, 792.0, chars), 1);
    let texts: Vec<&str> = layout.paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["top", "middle", "bottom"]);
}

#[test]
fn test_metrics_frozen_from_page() {
    let metrics = FontMetricsCollector::collect(&mock_line("measurements", 72.0, 700.0, 12.0));
    let helvetica = metrics.lookup("Helvetica", 12.0).unwrap();
    assert_eq!(helvetica.standard_char_width, Some(6.0));
    assert_eq!(helvetica.sample_count, 12);
}

#[test]
fn test_glyphs_from_extractor_json() {
    let json = r#"{
        "width": 612, "height": 792,
        "chars": [
            {"x0": 72, "y0": 700, "x1": 78, "y1": 712, "text": "O",
             "fontname": "ABCDEF+Arial", "size": 12, "non_stroking_color": [0, 0, 0]},
            {"x0": 78, "y0": 700, "x1": 84, "y1": 712, "text": "K",
             "fontname": "ABCDEF+Arial", "size": null}
        ]
    }"#;
    let page = PageInput::from_json(json).unwrap();
    assert_eq!(page.chars[1].font_size, 12.0);

    let layout = PageAnalyzer::default().analyze(&page, 1);
    assert_eq!(layout.paragraphs.len(), 1);
    assert_eq!(layout.paragraphs[0].text, "OK");
    assert_eq!(layout.paragraphs[0].font_name, "ABCDEF+Arial");
}

#[test]
fn test_pattern_and_nested_colors_do_not_reject_page() {
    let json = r#"{
        "width": 612, "height": 792,
        "chars": [
            {"x0": 72, "y0": 700, "x1": 78, "y1": 712, "text": "O",
             "fontname": "Helvetica", "size": 12, "non_stroking_color": "P0"},
            {"x0": 78, "y0": 700, "x1": 84, "y1": 712, "text": "K",
             "fontname": "Helvetica", "size": 12, "non_stroking_color": [[0, 0, 0]],
             "stroking_color": [[0.5]]}
        ]
    }"#;
    let page = PageInput::from_json(json).unwrap();
    assert!(page.chars[0].fill_color.is_unset());
    assert_eq!(page.chars[1].fill_color, ColorSpec::Components(vec![0.0, 0.0, 0.0]));
    assert_eq!(page.chars[1].stroke_color.to_rgb(), Some(Color::gray(0.5)));

    let layout = PageAnalyzer::default().analyze(&page, 1);
    assert_eq!(layout.paragraphs.len(), 1);
    assert_eq!(layout.paragraphs[0].text, "OK");
}

// ============================================================================
// Layout Thresholds
// ============================================================================

fn two_paragraph_page() -> PageInput {
    let mut chars = Vec::new();
    chars.extend(mock_line("first paragraph line one", 72.0, 700.0, 10.0));
    chars.extend(mock_line("first paragraph line two", 72.0, 688.0, 10.0));
    chars.extend(mock_line("second paragraph", 72.0, 648.0, 10.0));
    PageInput::new(612.0, 792.0, chars)
}

#[test]
fn test_wider_paragraph_gap_merges_paragraphs() {
    let page = two_paragraph_page();
    assert_eq!(PageAnalyzer::default().analyze(&page, 1).paragraphs.len(), 2);

    // 40pt step, below 5 * 10
    let config = LayoutConfig::default().with_paragraph_gap_factor(5.0);
    let layout = PageAnalyzer::new(config).analyze(&page, 1);
    assert_eq!(layout.paragraphs.len(), 1);
    assert_eq!(layout.paragraphs[0].distinct_line_count, 3);
    assert!(layout.paragraphs[0].text.ends_with("line two second paragraph"));
}

#[test]
fn test_row_gap_floor_keeps_rows_whole() {
    // the 200pt gutter no longer splits a row
    let config = LayoutConfig::default().with_row_gap_floor(250.0);
    let rows = cluster_lines(&two_column_page(3), &config);
    assert_eq!(rows.len(), 3);
    for segments in rows.values() {
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "left column bodyright column body");
    }
}

#[test]
fn test_paragraph_colors_from_first_glyph() {
    let chars: Vec<CharacterGlyph> = mock_line("red text", 72.0, 700.0, 12.0)
        .into_iter()
        .map(|g| {
            g.with_fill_color(ColorSpec::Components(vec![1.0, 0.0, 0.0]))
                .with_stroke_color(ColorSpec::Gray(0.0))
        })
        .collect();
    let layout = PageAnalyzer::default().analyze(&PageInput::new(612.0, 792.0, chars), 1);
    assert_eq!(layout.paragraphs[0].fill_color.to_rgb(), Some(Color::new(1.0, 0.0, 0.0)));
    assert_eq!(layout.paragraphs[0].stroke_color.to_rgb(), Some(Color::black()));
}
