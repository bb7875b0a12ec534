//! Paragraph records exchanged with the translation and rendering stages.
//!
//! Each record extends the previous one, and serializes flat:
//!
//! ```text
//! RawParagraph ──translate──▶ TranslatedParagraph ──fit──▶ FittedParagraph
//! ```

use crate::fitting::{FitMethod, TextFittingResult};
use crate::fonts::FontResolution;
use crate::geometry::BoundingBox;
use crate::layout::{ColorSpec, ParagraphCluster};
use serde::{Deserialize, Serialize};

/// A paragraph as found on the source page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParagraph {
    /// Source text
    pub text: String,
    /// PDF font name of the first glyph
    pub font_name: String,
    /// Font size of the first glyph
    pub font_size: f32,
    /// Fill color of the first glyph
    #[serde(default)]
    pub color: ColorSpec,
    /// Stroke color of the first glyph
    #[serde(default)]
    pub stroking_color: ColorSpec,
    /// Box the paragraph occupies
    pub bounding_box: BoundingBox,
    /// Column index on the page, left to right
    pub column: usize,
    /// Distinct visual lines
    pub num_lines: usize,
    /// Line segments the paragraph was built from
    pub segments: usize,
    /// 1-based page number
    pub page_number: usize,
}

impl RawParagraph {
    /// Record for an assembled paragraph.
    pub fn from_cluster(cluster: &ParagraphCluster, page_number: usize) -> Self {
        Self {
            text: cluster.text.clone(),
            font_name: cluster.font_name.clone(),
            font_size: cluster.font_size,
            color: cluster.fill_color.clone(),
            stroking_color: cluster.stroke_color.clone(),
            bounding_box: cluster.bounding_box,
            column: cluster.column_index,
            num_lines: cluster.distinct_line_count,
            segments: cluster.segments.len(),
            page_number,
        }
    }

    /// Attach a translation, keeping the source text alongside.
    pub fn translate(
        self,
        text: impl Into<String>,
        target_language: impl Into<String>,
    ) -> TranslatedParagraph {
        TranslatedParagraph::new(self, text, target_language)
    }
}

/// A paragraph whose text has been replaced by its translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedParagraph {
    /// Source record with `text` holding the translation
    #[serde(flatten)]
    pub paragraph: RawParagraph,
    /// Text before translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// Language code of the translation
    pub target_language: String,
}

impl TranslatedParagraph {
    /// Replace the text of `paragraph` with `text`.
    pub fn new(
        mut paragraph: RawParagraph,
        text: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        let source_text = std::mem::replace(&mut paragraph.text, text.into());
        Self {
            paragraph,
            source_text: Some(source_text),
            target_language: target_language.into(),
        }
    }

    /// Translated text.
    pub fn text(&self) -> &str {
        &self.paragraph.text
    }
}

/// A translated paragraph laid out for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedParagraph {
    /// The translated record
    #[serde(flatten)]
    pub translated: TranslatedParagraph,
    /// Lines to draw, top to bottom
    pub fitted_lines: Vec<String>,
    /// Size to draw them at
    pub scaled_font_size: f32,
    /// How the lines were produced
    pub fit_method: FitMethod,
    /// Text overflows the box
    #[serde(default)]
    pub is_truncated: bool,
    /// Font to draw with
    pub font: FontResolution,
}

impl FittedParagraph {
    /// Combine a translated paragraph with its fitting result.
    pub fn new(
        translated: TranslatedParagraph,
        result: TextFittingResult,
        font: FontResolution,
    ) -> Self {
        Self {
            translated,
            fitted_lines: result.lines,
            scaled_font_size: result.scaled_font_size,
            fit_method: result.fit_method,
            is_truncated: result.is_truncated,
            font,
        }
    }

    /// Pass a paragraph through without fitting.
    pub fn not_fitted(translated: TranslatedParagraph, font: FontResolution) -> Self {
        let font_size = translated.paragraph.font_size;
        Self::new(translated, TextFittingResult::empty(font_size, FitMethod::NotFitted), font)
    }

    /// The underlying source record.
    pub fn paragraph(&self) -> &RawParagraph {
        &self.translated.paragraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FontClass, FontStyle};

    fn mock_paragraph() -> RawParagraph {
        RawParagraph {
            text: "Annual report".to_string(),
            font_name: "ABCDEF+Helvetica-Bold".to_string(),
            font_size: 14.0,
            color: ColorSpec::Gray(0.0),
            stroking_color: ColorSpec::Unset,
            bounding_box: BoundingBox::new(72.0, 700.0, 300.0, 716.0),
            column: 0,
            num_lines: 1,
            segments: 1,
            page_number: 1,
        }
    }

    #[test]
    fn test_translate_keeps_source() {
        let translated = mock_paragraph().translate("Rapport annuel", "fr");
        assert_eq!(translated.text(), "Rapport annuel");
        assert_eq!(translated.source_text.as_deref(), Some("Annual report"));
        assert_eq!(translated.paragraph.font_size, 14.0);
    }

    #[test]
    fn test_fitted_json_is_flat() {
        let translated = mock_paragraph().translate("Rapport annuel", "fr");
        let font = FontResolution::Resolved {
            name: "Helvetica-Bold".to_string(),
            class: FontClass::Sans,
            style: FontStyle::Bold,
        };
        let fitted = FittedParagraph::not_fitted(translated, font);
        let value = serde_json::to_value(&fitted).unwrap();

        assert_eq!(value["text"], "Rapport annuel");
        assert_eq!(value["source_text"], "Annual report");
        assert_eq!(value["target_language"], "fr");
        assert_eq!(value["num_lines"], 1);
        assert_eq!(value["fit_method"], "not_fitted");
        assert_eq!(value["scaled_font_size"], 14.0);
        assert_eq!(value["bounding_box"]["x0"], 72.0);
        assert_eq!(value["font"]["status"], "resolved");

        let back: FittedParagraph = serde_json::from_value(value).unwrap();
        assert_eq!(back, fitted);
    }

    #[test]
    fn test_raw_from_json_defaults_colors() {
        let json = r#"{
            "text": "Hello", "font_name": "Times-Roman", "font_size": 12,
            "bounding_box": {"x0": 0, "y0": 0, "x1": 50, "y1": 12},
            "column": 1, "num_lines": 1, "segments": 1, "page_number": 2
        }"#;
        let raw: RawParagraph = serde_json::from_str(json).unwrap();
        assert_eq!(raw.color, ColorSpec::Unset);
        assert_eq!(raw.page_number, 2);
    }
}
