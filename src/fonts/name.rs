//! Parsing of PDF font names into family and style.
//!
//! PDF font names come in many shapes: `ABCDEF+TimesNewRomanPS-BoldMT`,
//! `Arial,BoldItalic`, `Helvetica-Oblique`, `CMR10`. We strip the subset
//! prefix, split the style part off at the first `,` or `-`, read weight and
//! slant from the style words, and classify the family through a static
//! table of well-known faces.

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Six uppercase letters and a plus sign mark an embedded subset
    static ref RE_SUBSET_PREFIX: Regex = Regex::new(r"^[A-Z]{6}\+").unwrap();

    /// Vendor and packaging suffixes that carry no family information
    static ref RE_FAMILY_SUFFIX: Regex = Regex::new(r"(psmt|mt|ps|std|pro|lt)$").unwrap();

    /// Weight words heavy enough to render as bold
    static ref RE_BOLD: Regex = Regex::new(r"(?i)bold|black|heavy|semibold|demi").unwrap();

    /// Slant words
    static ref RE_ITALIC: Regex = Regex::new(r"(?i)italic|oblique|slanted").unwrap();

    /// Style words that may be glued to the family without a separator
    static ref RE_GLUED_STYLE: Regex =
        Regex::new(r"(?i)(bolditalic|boldoblique|bold|italic|oblique|regular)$").unwrap();
}

/// Width class of a typeface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontClass {
    /// Latin sans-serif
    #[default]
    Sans,
    /// Latin serif
    Serif,
    /// Sans-serif with square CJK glyphs
    SansCjk,
    /// Serif with square CJK glyphs
    SerifCjk,
}

impl FontClass {
    /// Whether glyphs are full-width CJK.
    pub fn is_cjk(self) -> bool {
        matches!(self, FontClass::SansCjk | FontClass::SerifCjk)
    }

    /// The CJK counterpart of a Latin class.
    pub fn to_cjk(self) -> Self {
        match self {
            FontClass::Sans | FontClass::SansCjk => FontClass::SansCjk,
            FontClass::Serif | FontClass::SerifCjk => FontClass::SerifCjk,
        }
    }
}

/// Weight and slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Upright, normal weight
    #[default]
    Regular,
    /// Upright, bold
    Bold,
    /// Slanted, normal weight
    Italic,
    /// Slanted, bold
    BoldItalic,
}

impl FontStyle {
    /// Combine weight and slant flags.
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontStyle::Regular,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }

    /// Bold or bold-italic.
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    /// Italic or bold-italic.
    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// The standard PDF families a renderer always has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base14Family {
    /// Helvetica (sans-serif)
    Helvetica,
    /// Times (serif)
    Times,
    /// Courier (monospace)
    Courier,
}

impl Base14Family {
    /// Width class used when estimating text in this family.
    pub fn class(self) -> FontClass {
        match self {
            Base14Family::Times => FontClass::Serif,
            Base14Family::Helvetica | Base14Family::Courier => FontClass::Sans,
        }
    }

    /// Concrete base-14 font name for a style.
    pub fn font_name(self, style: FontStyle) -> &'static str {
        match (self, style) {
            (Base14Family::Helvetica, FontStyle::Regular) => "Helvetica",
            (Base14Family::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
            (Base14Family::Helvetica, FontStyle::Italic) => "Helvetica-Oblique",
            (Base14Family::Helvetica, FontStyle::BoldItalic) => "Helvetica-BoldOblique",
            (Base14Family::Times, FontStyle::Regular) => "Times-Roman",
            (Base14Family::Times, FontStyle::Bold) => "Times-Bold",
            (Base14Family::Times, FontStyle::Italic) => "Times-Italic",
            (Base14Family::Times, FontStyle::BoldItalic) => "Times-BoldItalic",
            (Base14Family::Courier, FontStyle::Regular) => "Courier",
            (Base14Family::Courier, FontStyle::Bold) => "Courier-Bold",
            (Base14Family::Courier, FontStyle::Italic) => "Courier-Oblique",
            (Base14Family::Courier, FontStyle::BoldItalic) => "Courier-BoldOblique",
        }
    }
}

/// Well-known families keyed by their normalized name.
static KNOWN_FAMILIES: phf::Map<&'static str, Base14Family> = phf_map! {
    // Sans-serif
    "helvetica" => Base14Family::Helvetica,
    "helveticaneue" => Base14Family::Helvetica,
    "arial" => Base14Family::Helvetica,
    "arialnarrow" => Base14Family::Helvetica,
    "calibri" => Base14Family::Helvetica,
    "verdana" => Base14Family::Helvetica,
    "tahoma" => Base14Family::Helvetica,
    "segoeui" => Base14Family::Helvetica,
    "trebuchet" => Base14Family::Helvetica,
    "roboto" => Base14Family::Helvetica,
    "opensans" => Base14Family::Helvetica,
    "notosans" => Base14Family::Helvetica,
    "liberationsans" => Base14Family::Helvetica,
    "dejavusans" => Base14Family::Helvetica,
    "frutiger" => Base14Family::Helvetica,
    "univers" => Base14Family::Helvetica,
    "futura" => Base14Family::Helvetica,
    "gillsans" => Base14Family::Helvetica,
    "myriad" => Base14Family::Helvetica,
    "sourcesans" => Base14Family::Helvetica,
    // Serif
    "times" => Base14Family::Times,
    "timesroman" => Base14Family::Times,
    "timesnewroman" => Base14Family::Times,
    "georgia" => Base14Family::Times,
    "garamond" => Base14Family::Times,
    "cambria" => Base14Family::Times,
    "palatino" => Base14Family::Times,
    "palatinolinotype" => Base14Family::Times,
    "bookantiqua" => Base14Family::Times,
    "minion" => Base14Family::Times,
    "baskerville" => Base14Family::Times,
    "centuryschoolbook" => Base14Family::Times,
    "notoserif" => Base14Family::Times,
    "liberationserif" => Base14Family::Times,
    "dejavuserif" => Base14Family::Times,
    "sourceserif" => Base14Family::Times,
    "cmr" => Base14Family::Times,
    "lmroman" => Base14Family::Times,
    // Monospace
    "courier" => Base14Family::Courier,
    "couriernew" => Base14Family::Courier,
    "consolas" => Base14Family::Courier,
    "menlo" => Base14Family::Courier,
    "monaco" => Base14Family::Courier,
    "lucidaconsole" => Base14Family::Courier,
    "liberationmono" => Base14Family::Courier,
    "dejavusansmono" => Base14Family::Courier,
    "sourcecode" => Base14Family::Courier,
    "cmtt" => Base14Family::Courier,
};

/// A PDF font name broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFontName {
    /// Name without a subset prefix
    pub base_name: String,
    /// Normalized family key, e.g. `timesnewroman`
    pub family: String,
    /// Weight and slant
    pub style: FontStyle,
    /// Matching standard family, when the family is known
    pub base14: Option<Base14Family>,
}

impl ParsedFontName {
    /// Width class, defaulting to sans-serif for unknown families.
    pub fn class(&self) -> FontClass {
        self.base14.map(Base14Family::class).unwrap_or_default()
    }
}

fn truncate_at_match(family: &mut String, re: &Regex) {
    let cut = re
        .find(family.as_str())
        .map(|m| m.start())
        .filter(|&start| start > 0);
    if let Some(cut) = cut {
        family.truncate(cut);
    }
}

fn normalize_family(raw: &str) -> String {
    let mut family: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    // Design-size digits as in CMR10
    let without_digits = family.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    family.truncate(without_digits);
    truncate_at_match(&mut family, &RE_FAMILY_SUFFIX);
    truncate_at_match(&mut family, &RE_GLUED_STYLE);
    family
}

/// Parse a PDF font name.
///
/// # Examples
///
/// ```
/// use pdf_reflow::fonts::{parse_font_name, Base14Family, FontStyle};
///
/// let parsed = parse_font_name("ABCDEF+TimesNewRomanPS-BoldItalicMT");
/// assert_eq!(parsed.base_name, "TimesNewRomanPS-BoldItalicMT");
/// assert_eq!(parsed.family, "timesnewroman");
/// assert_eq!(parsed.style, FontStyle::BoldItalic);
/// assert_eq!(parsed.base14, Some(Base14Family::Times));
///
/// let parsed = parse_font_name("Arial,Bold");
/// assert_eq!(parsed.style, FontStyle::Bold);
/// assert_eq!(parsed.base14, Some(Base14Family::Helvetica));
/// ```
pub fn parse_font_name(pdf_name: &str) -> ParsedFontName {
    let base_name = RE_SUBSET_PREFIX.replace(pdf_name.trim(), "").into_owned();

    let (family_part, style_part) = match base_name.find([',', '-']) {
        Some(idx) => (&base_name[..idx], &base_name[idx + 1..]),
        None => (base_name.as_str(), ""),
    };

    // Without a separator the style words are glued to the family.
    let style_source = if style_part.is_empty() {
        family_part
    } else {
        style_part
    };
    let style = FontStyle::from_flags(
        RE_BOLD.is_match(style_source),
        RE_ITALIC.is_match(style_source),
    );

    let family = normalize_family(family_part);
    let base14 = KNOWN_FAMILIES.get(family.as_str()).copied();

    ParsedFontName {
        base_name,
        family,
        style,
        base14,
    }
}
