//! Estimated text widths.
//!
//! Translated text has no glyph positions yet, so its width is predicted
//! from a per-class average character width. A measured width taken from the
//! source PDF replaces the table estimate when one is available.

use crate::fonts::{FontClass, FontStyle};

/// Uppercase share at which text counts as all caps.
pub const UPPERCASE_THRESHOLD: f32 = 0.7;

/// Average glyph width as a fraction of the font size.
///
/// # Examples
///
/// ```
/// use pdf_reflow::fitting::base_width_ratio;
/// use pdf_reflow::fonts::{FontClass, FontStyle};
///
/// assert_eq!(base_width_ratio(FontClass::Serif, FontStyle::Bold), 0.52);
/// assert_eq!(base_width_ratio(FontClass::SansCjk, FontStyle::Italic), 1.0);
/// ```
pub fn base_width_ratio(class: FontClass, style: FontStyle) -> f32 {
    match (class, style) {
        (FontClass::Sans, FontStyle::Regular) => 0.52,
        (FontClass::Sans, FontStyle::Bold) => 0.56,
        (FontClass::Sans, FontStyle::Italic) => 0.50,
        (FontClass::Sans, FontStyle::BoldItalic) => 0.55,
        (FontClass::Serif, FontStyle::Regular) => 0.48,
        (FontClass::Serif, FontStyle::Bold) => 0.52,
        (FontClass::Serif, FontStyle::Italic) => 0.46,
        (FontClass::Serif, FontStyle::BoldItalic) => 0.51,
        // square glyphs
        (FontClass::SansCjk, _) | (FontClass::SerifCjk, _) => 1.0,
    }
}

/// Letter statistics of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CaseProfile {
    /// Non-whitespace characters
    pub visible: usize,
    /// Alphabetic characters
    pub alphabetic: usize,
    /// Uppercase characters
    pub uppercase: usize,
}

impl CaseProfile {
    /// Count the characters of `text`.
    pub fn of(text: &str) -> Self {
        let mut profile = Self::default();
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            profile.visible += 1;
            if c.is_alphabetic() {
                profile.alphabetic += 1;
                if c.is_uppercase() {
                    profile.uppercase += 1;
                }
            }
        }
        profile
    }

    /// Share of letters that are uppercase.
    pub fn uppercase_ratio(&self) -> f32 {
        if self.alphabetic == 0 {
            return 0.0;
        }
        self.uppercase as f32 / self.alphabetic as f32
    }

    /// At least 70% of the letters are uppercase.
    pub fn is_mostly_uppercase(&self) -> bool {
        self.alphabetic > 0 && self.uppercase_ratio() >= UPPERCASE_THRESHOLD
    }

    /// Fewer than half of the visible characters are letters.
    pub fn is_symbol_heavy(&self) -> bool {
        (self.alphabetic as f32) < self.visible as f32 * 0.5
    }

    /// Width multiplier for Latin fonts.
    pub fn width_multiplier(&self) -> f32 {
        if self.is_symbol_heavy() {
            0.85
        } else if self.is_mostly_uppercase() {
            1.02
        } else {
            0.90
        }
    }
}

/// A character width measured in the source document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardWidth {
    /// Measured width in points
    pub width: f32,
    /// Font size the width was measured at
    pub measured_size: f32,
}

impl StandardWidth {
    /// Create a measured width.
    pub fn new(width: f32, measured_size: f32) -> Self {
        Self {
            width,
            measured_size,
        }
    }

    /// Width at another font size.
    pub fn at_size(&self, font_size: f32) -> f32 {
        if self.measured_size <= 0.0 {
            return self.width;
        }
        self.width * font_size / self.measured_size
    }
}

/// Width estimator for one paragraph.
///
/// The case multiplier is taken from the whole paragraph so every line of
/// it is measured with the same character width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthModel {
    ratio: f32,
    standard: Option<StandardWidth>,
}

impl WidthModel {
    /// Build the estimator for `text` set in the given font class and style.
    pub fn new(class: FontClass, style: FontStyle, text: &str) -> Self {
        let multiplier = if class.is_cjk() {
            1.0
        } else {
            CaseProfile::of(text).width_multiplier()
        };
        Self {
            ratio: base_width_ratio(class, style) * multiplier,
            standard: None,
        }
    }

    /// Use a measured width instead of the table estimate.
    pub fn with_standard_width(mut self, standard: Option<StandardWidth>) -> Self {
        self.standard = standard.filter(|s| s.width > 0.0);
        self
    }

    /// Whether a measured width is in use.
    pub fn is_measured(&self) -> bool {
        self.standard.is_some()
    }

    /// Width of one character.
    pub fn char_width(&self, font_size: f32) -> f32 {
        match self.standard {
            Some(standard) => standard.at_size(font_size),
            None => self.ratio * font_size,
        }
    }

    /// Width of a string.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.char_width(font_size)
    }
}
