//! Job-scoped font registry.
//!
//! The registry knows which fonts the renderer can use for one translation
//! job: the PDF base-14 faces plus any fonts registered for target
//! languages. Resolving a source font never fails; when no exact match is
//! available the caller receives a [`FontResolution::Fallback`] that names the
//! substitute and says why it was chosen.

use crate::fonts::name::{parse_font_name, Base14Family, FontClass, FontStyle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A font the renderer can draw with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFace {
    /// Name the renderer knows the font by
    pub name: String,
    /// Width class
    pub class: FontClass,
    /// Weight and slant
    pub style: FontStyle,
}

impl FontFace {
    /// Describe a font.
    pub fn new(name: impl Into<String>, class: FontClass, style: FontStyle) -> Self {
        Self {
            name: name.into(),
            class,
            style,
        }
    }
}

/// Why a fallback font was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The source family is not in the table of known faces
    UnknownFamily,
    /// The target language needs a script-specific font that is not registered
    NoLanguageFont,
    /// The source font name was empty
    MissingFontName,
}

/// Outcome of resolving a source font for a target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FontResolution {
    /// A matching font is available
    Resolved {
        /// Font name for the renderer
        name: String,
        /// Width class for fitting
        class: FontClass,
        /// Style for fitting
        style: FontStyle,
    },
    /// A substitute was chosen
    Fallback {
        /// Substitute font name
        name: String,
        /// Width class for fitting
        class: FontClass,
        /// Style for fitting
        style: FontStyle,
        /// Why the substitute was needed
        reason: FallbackReason,
    },
}

impl FontResolution {
    /// Font name for the renderer.
    pub fn name(&self) -> &str {
        match self {
            FontResolution::Resolved { name, .. } | FontResolution::Fallback { name, .. } => name,
        }
    }

    /// Width class for fitting.
    pub fn class(&self) -> FontClass {
        match self {
            FontResolution::Resolved { class, .. } | FontResolution::Fallback { class, .. } => {
                *class
            },
        }
    }

    /// Style for fitting.
    pub fn style(&self) -> FontStyle {
        match self {
            FontResolution::Resolved { style, .. } | FontResolution::Fallback { style, .. } => {
                *style
            },
        }
    }

    /// Whether a substitute was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontResolution::Fallback { .. })
    }
}

/// Primary subtag of a language code, lowercased: `zh-Hant` → `zh`.
pub fn primary_language(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Languages written with full-width CJK glyphs.
pub fn is_cjk_language(code: &str) -> bool {
    matches!(primary_language(code).as_str(), "ja" | "zh" | "ko")
}

/// Fonts available to one translation job.
///
/// # Examples
///
/// ```
/// use pdf_reflow::fonts::{FontClass, FontRegistry};
///
/// let mut registry = FontRegistry::with_translation_defaults();
///
/// let latin = registry.resolve("ABCDEF+Arial-BoldMT", "fr");
/// assert_eq!(latin.name(), "Helvetica-Bold");
/// assert!(!latin.is_fallback());
///
/// let japanese = registry.resolve("Times-Roman", "ja");
/// assert_eq!(japanese.name(), "NotoSansJP-Regular");
/// assert_eq!(japanese.class(), FontClass::SansCjk);
/// ```
#[derive(Debug, Clone)]
pub struct FontRegistry {
    fonts: HashMap<String, FontFace>,
    language_fonts: HashMap<String, String>,
    cache: HashMap<(String, String), FontResolution>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    /// Create a registry holding the base-14 text faces.
    pub fn new() -> Self {
        let mut registry = Self {
            fonts: HashMap::new(),
            language_fonts: HashMap::new(),
            cache: HashMap::new(),
        };
        registry.register_base14_fonts();
        registry
    }

    /// Registry with the language fonts a translation job usually ships.
    pub fn with_translation_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_language_font(
            "ja",
            FontFace::new("NotoSansJP-Regular", FontClass::SansCjk, FontStyle::Regular),
        );
        registry.register_language_font(
            "zh",
            FontFace::new("NotoSansCJK-Regular", FontClass::SansCjk, FontStyle::Regular),
        );
        registry.register_language_font(
            "ko",
            FontFace::new("NotoSansCJK-Regular", FontClass::SansCjk, FontStyle::Regular),
        );
        registry.register_language_font(
            "vi",
            FontFace::new("TimesNewRoman-Regular", FontClass::Serif, FontStyle::Regular),
        );
        registry
    }

    fn register_base14_fonts(&mut self) {
        let styles = [
            FontStyle::Regular,
            FontStyle::Bold,
            FontStyle::Italic,
            FontStyle::BoldItalic,
        ];
        for family in [Base14Family::Helvetica, Base14Family::Times, Base14Family::Courier] {
            for style in styles {
                self.register_font(FontFace::new(family.font_name(style), family.class(), style));
            }
        }
    }

    /// Make a font available.
    pub fn register_font(&mut self, face: FontFace) {
        self.cache.clear();
        self.fonts.insert(face.name.clone(), face);
    }

    /// Make a font available and use it for a target language.
    pub fn register_language_font(&mut self, language: &str, face: FontFace) {
        self.language_fonts
            .insert(primary_language(language), face.name.clone());
        self.register_font(face);
    }

    /// Look up a registered font.
    pub fn get(&self, name: &str) -> Option<&FontFace> {
        self.fonts.get(name)
    }

    /// Whether a font is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Number of registered fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Font registered for a target language.
    pub fn language_font(&self, language: &str) -> Option<&FontFace> {
        self.language_fonts
            .get(&primary_language(language))
            .and_then(|name| self.fonts.get(name))
    }

    /// Resolve the font to render a paragraph set in `pdf_font_name` once
    /// translated into `target_language`.
    pub fn resolve(&mut self, pdf_font_name: &str, target_language: &str) -> FontResolution {
        let key = (pdf_font_name.to_string(), primary_language(target_language));
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let resolution = self.resolve_uncached(pdf_font_name, target_language);
        if let FontResolution::Fallback { name, reason, .. } = &resolution {
            log::warn!(
                "Font '{}' for language '{}' falls back to {} ({:?})",
                pdf_font_name,
                target_language,
                name,
                reason
            );
        }
        self.cache.insert(key, resolution.clone());
        resolution
    }

    fn resolve_uncached(&self, pdf_font_name: &str, target_language: &str) -> FontResolution {
        let parsed = parse_font_name(pdf_font_name);
        let cjk = is_cjk_language(target_language);

        // The face replaces the family; weight and slant stay those of the source.
        if let Some(face) = self.language_font(target_language) {
            let class = if cjk { face.class.to_cjk() } else { face.class };
            return FontResolution::Resolved {
                name: face.name.clone(),
                class,
                style: parsed.style,
            };
        }

        if cjk {
            let family = parsed.base14.unwrap_or(Base14Family::Helvetica);
            return FontResolution::Fallback {
                name: family.font_name(parsed.style).to_string(),
                class: parsed.class().to_cjk(),
                style: parsed.style,
                reason: FallbackReason::NoLanguageFont,
            };
        }

        if parsed.base_name.is_empty() {
            return FontResolution::Fallback {
                name: Base14Family::Helvetica.font_name(FontStyle::Regular).to_string(),
                class: FontClass::Sans,
                style: FontStyle::Regular,
                reason: FallbackReason::MissingFontName,
            };
        }

        if let Some(face) = self.fonts.get(&parsed.base_name) {
            return FontResolution::Resolved {
                name: face.name.clone(),
                class: face.class,
                style: face.style,
            };
        }

        match parsed.base14 {
            Some(family) => FontResolution::Resolved {
                name: family.font_name(parsed.style).to_string(),
                class: family.class(),
                style: parsed.style,
            },
            None => FontResolution::Fallback {
                name: Base14Family::Helvetica.font_name(parsed.style).to_string(),
                class: FontClass::Sans,
                style: parsed.style,
                reason: FallbackReason::UnknownFamily,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base14_registered() {
        let registry = FontRegistry::new();
        assert_eq!(registry.len(), 12);
        assert!(registry.contains("Times-BoldItalic"));
        assert_eq!(registry.get("Courier").unwrap().class, FontClass::Sans);
    }

    #[test]
    fn test_resolve_known_family() {
        let mut registry = FontRegistry::new();
        let r = registry.resolve("TimesNewRomanPS-ItalicMT", "de");
        assert_eq!(
            r,
            FontResolution::Resolved {
                name: "Times-Italic".to_string(),
                class: FontClass::Serif,
                style: FontStyle::Italic,
            }
        );
    }

    #[test]
    fn test_resolve_registered_custom_font() {
        let mut registry = FontRegistry::new();
        registry.register_font(FontFace::new("Garamond-Bold", FontClass::Serif, FontStyle::Bold));
        let r = registry.resolve("XYZABC+Garamond-Bold", "es");
        assert_eq!(r.name(), "Garamond-Bold");
        assert!(!r.is_fallback());
    }

    #[test]
    fn test_unknown_family_falls_back() {
        let mut registry = FontRegistry::new();
        let r = registry.resolve("FancyScript-Bold", "fr");
        assert_eq!(
            r,
            FontResolution::Fallback {
                name: "Helvetica-Bold".to_string(),
                class: FontClass::Sans,
                style: FontStyle::Bold,
                reason: FallbackReason::UnknownFamily,
            }
        );
    }

    #[test]
    fn test_empty_name_falls_back() {
        let mut registry = FontRegistry::new();
        let r = registry.resolve("", "fr");
        assert!(matches!(
            r,
            FontResolution::Fallback {
                reason: FallbackReason::MissingFontName,
                ..
            }
        ));
    }

    #[test]
    fn test_cjk_without_language_font() {
        let mut registry = FontRegistry::new();
        let r = registry.resolve("Times-Bold", "zh-Hans");
        assert_eq!(r.class(), FontClass::SerifCjk);
        assert!(matches!(
            r,
            FontResolution::Fallback {
                reason: FallbackReason::NoLanguageFont,
                ..
            }
        ));
    }

    #[test]
    fn test_language_font_wins() {
        let mut registry = FontRegistry::with_translation_defaults();
        let r = registry.resolve("Helvetica-Bold", "vi");
        assert_eq!(r.name(), "TimesNewRoman-Regular");
        assert_eq!(r.class(), FontClass::Serif);
        assert_eq!(r.style(), FontStyle::Bold);

        let r = registry.resolve("ABCDEF+Arial,Italic", "vi");
        assert_eq!(r.style(), FontStyle::Italic);

        let r = registry.resolve("Helvetica", "ko_KR");
        assert_eq!(r.name(), "NotoSansCJK-Regular");
    }

    #[test]
    fn test_registering_invalidates_cache() {
        let mut registry = FontRegistry::new();
        assert!(registry.resolve("Arial", "ja").is_fallback());
        registry.register_language_font(
            "ja",
            FontFace::new("NotoSansJP-Regular", FontClass::SansCjk, FontStyle::Regular),
        );
        assert!(!registry.resolve("Arial", "ja").is_fallback());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(primary_language(" zh-Hant "), "zh");
        assert_eq!(primary_language("PT_br"), "pt");
        assert!(is_cjk_language("JA"));
        assert!(!is_cjk_language("vi"));
    }
}
