//! Character-level glyph records as delivered by glyph extraction.
//!
//! Field names on the wire follow the extraction collaborator (`fontname`,
//! `size`, `non_stroking_color`, `stroking_color`). Missing values are
//! defaulted instead of rejected so that one sloppy glyph never costs a page.

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Font size assumed when a glyph reports none.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Font name assumed when a glyph reports none.
pub const UNKNOWN_FONT_NAME: &str = "Unknown";

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a gray level.
    pub fn gray(level: f32) -> Self {
        Self::new(level, level, level)
    }
}

/// A fill or stroke color exactly as extraction reported it.
///
/// Extraction emits nothing, a bare gray level, or a component list whose
/// length selects the color space (1 = gray, 3 = RGB, 4 = CMYK).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// No color reported
    #[default]
    Unset,
    /// Single gray level
    Gray(f32),
    /// Raw color components
    Components(Vec<f32>),
}

impl ColorSpec {
    /// Convert to RGB, if the component count names a known color space.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::layout::{Color, ColorSpec};
    ///
    /// assert_eq!(ColorSpec::Gray(0.0).to_rgb(), Some(Color::black()));
    /// assert_eq!(
    ///     ColorSpec::Components(vec![0.0, 0.0, 0.0, 1.0]).to_rgb(),
    ///     Some(Color::black())
    /// );
    /// assert_eq!(ColorSpec::Unset.to_rgb(), None);
    /// ```
    pub fn to_rgb(&self) -> Option<Color> {
        match self {
            ColorSpec::Unset => None,
            ColorSpec::Gray(level) => Some(Color::gray(*level)),
            ColorSpec::Components(c) => match c.as_slice() {
                [level] => Some(Color::gray(*level)),
                [r, g, b] => Some(Color::new(*r, *g, *b)),
                [c, m, y, k] => Some(Color::new(
                    (1.0 - c) * (1.0 - k),
                    (1.0 - m) * (1.0 - k),
                    (1.0 - y) * (1.0 - k),
                )),
                _ => None,
            },
        }
    }

    /// True when no color was reported.
    pub fn is_unset(&self) -> bool {
        matches!(self, ColorSpec::Unset)
    }

    /// Read a color from whatever shape extraction produced.
    ///
    /// A list wrapped in a one-element list is unwrapped. Pattern names and
    /// other shapes carry no usable color and become [`ColorSpec::Unset`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::layout::ColorSpec;
    /// use serde_json::json;
    ///
    /// assert_eq!(ColorSpec::from_json_value(&json!(0.5)), ColorSpec::Gray(0.5));
    /// assert_eq!(
    ///     ColorSpec::from_json_value(&json!([[0, 0, 1]])),
    ///     ColorSpec::Components(vec![0.0, 0.0, 1.0])
    /// );
    /// assert_eq!(ColorSpec::from_json_value(&json!("P0")), ColorSpec::Unset);
    /// ```
    pub fn from_json_value(value: &Value) -> Self {
        match value {
            Value::Null => ColorSpec::Unset,
            Value::Number(n) => match n.as_f64() {
                Some(level) => ColorSpec::Gray(level as f32),
                None => unsupported_color(value),
            },
            Value::Array(items) => match items.as_slice() {
                [] => ColorSpec::Unset,
                [nested @ Value::Array(_)] => Self::from_json_value(nested),
                _ => items
                    .iter()
                    .map(|c| c.as_f64().map(|c| c as f32))
                    .collect::<Option<Vec<f32>>>()
                    .map(ColorSpec::Components)
                    .unwrap_or_else(|| unsupported_color(value)),
            },
            _ => unsupported_color(value),
        }
    }
}

fn unsupported_color(value: &Value) -> ColorSpec {
    log::warn!("Unsupported glyph color {}, treating as unset", value);
    ColorSpec::Unset
}

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<ColorSpec, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(ColorSpec::from_json_value(&value))
}

/// A glyph as extraction writes it, before defaults are applied.
#[derive(Deserialize)]
struct WireGlyph {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    #[serde(default)]
    text: String,
    #[serde(default)]
    fontname: Option<String>,
    #[serde(default)]
    size: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_color")]
    non_stroking_color: ColorSpec,
    #[serde(default, deserialize_with = "deserialize_color")]
    stroking_color: ColorSpec,
}

impl From<WireGlyph> for CharacterGlyph {
    fn from(wire: WireGlyph) -> Self {
        let size = wire.size.filter(|s| s.is_finite() && *s > 0.0);
        Self {
            x0: wire.x0,
            y0: wire.y0,
            x1: wire.x1,
            y1: wire.y1,
            text: wire.text,
            font_name: wire
                .fontname
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_FONT_NAME.to_string()),
            font_size: size.unwrap_or(DEFAULT_FONT_SIZE),
            fill_color: wire.non_stroking_color,
            stroke_color: wire.stroking_color,
            size_reported: size.is_some(),
        }
    }
}

/// One extracted character with its geometry and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireGlyph")]
pub struct CharacterGlyph {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// The character (usually a single code point)
    pub text: String,
    /// PDF font name, possibly with a subset prefix
    #[serde(rename = "fontname")]
    pub font_name: String,
    /// Font size in points
    #[serde(rename = "size")]
    pub font_size: f32,
    /// Fill color
    #[serde(rename = "non_stroking_color")]
    pub fill_color: ColorSpec,
    /// Stroke color
    #[serde(rename = "stroking_color")]
    pub stroke_color: ColorSpec,
    #[serde(skip_serializing)]
    size_reported: bool,
}

impl CharacterGlyph {
    /// Create a glyph with unset colors.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::geometry::BoundingBox;
    /// use pdf_reflow::layout::CharacterGlyph;
    ///
    /// let bbox = BoundingBox::new(10.0, 700.0, 17.0, 712.0);
    /// let g = CharacterGlyph::new("A", bbox, "Helvetica", 12.0);
    /// assert_eq!(g.width(), 7.0);
    /// assert!(!g.is_whitespace());
    /// ```
    pub fn new(
        text: impl Into<String>,
        bbox: BoundingBox,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            x0: bbox.x0,
            y0: bbox.y0,
            x1: bbox.x1,
            y1: bbox.y1,
            text: text.into(),
            font_name: font_name.into(),
            font_size,
            fill_color: ColorSpec::Unset,
            stroke_color: ColorSpec::Unset,
            size_reported: true,
        }
    }

    /// False when extraction gave no usable size and [`DEFAULT_FONT_SIZE`]
    /// was filled in.
    pub fn has_reported_size(&self) -> bool {
        self.size_reported
    }

    /// Replace a filled-in size; reported sizes are kept.
    pub fn with_default_size(mut self, font_size: f32) -> Self {
        if !self.size_reported {
            self.font_size = font_size;
        }
        self
    }

    /// Set the fill color.
    pub fn with_fill_color(mut self, color: ColorSpec) -> Self {
        self.fill_color = color;
        self
    }

    /// Set the stroke color.
    pub fn with_stroke_color(mut self, color: ColorSpec) -> Self {
        self.stroke_color = color;
        self
    }

    /// Bounding box of the glyph.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x0, self.y0, self.x1, self.y1)
    }

    /// Advance width as measured from the bounding box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Empty or whitespace-only glyphs carry no width information.
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check the geometry invariants `x1 >= x0`, `y1 >= y0` and finiteness.
    pub fn validate(&self) -> Result<()> {
        let coords = [self.x0, self.y0, self.x1, self.y1];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(self.invalid("non-finite coordinate"));
        }
        if self.x1 < self.x0 {
            return Err(self.invalid(format!("x1 {} < x0 {}", self.x1, self.x0)));
        }
        if self.y1 < self.y0 {
            return Err(self.invalid(format!("y1 {} < y0 {}", self.y1, self.y0)));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidGlyph {
            text: self.text.clone(),
            reason: reason.into(),
        }
    }
}
