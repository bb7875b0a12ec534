//! Greedy line wrapping against an estimated width.

use crate::fitting::width_model::WidthModel;

/// Share of the box width a wrapped line may fill.
pub const WIDTH_SAFETY_MARGIN: f32 = 0.97;

/// Share of the box width used when sizing hyphenated chunks.
pub const BREAK_MARGIN: f32 = 0.96;

/// Share of the box width used when rebalancing lines.
pub const REBALANCE_MARGIN: f32 = 0.96;

/// Utilisation spread, in percentage points, that triggers a rebalance.
const REBALANCE_SPREAD: f32 = 20.0;

/// Lines below this utilisation count as underfilled.
const UNDERFILLED_UTILIZATION: f32 = 80.0;

/// Returns true for ideographs, kana and hangul.
pub fn is_cjk_char(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3200..=0x32FF
        | 0x3300..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0x20000..=0x2A6DF
        | 0x2A700..=0x2B81F)
}

/// Text split into wrappable units.
///
/// Scripts that separate words with spaces are split on whitespace. Text
/// that is mostly CJK has no word boundaries, so every character becomes a
/// unit and units are joined without a separator.
#[derive(Debug, Clone, PartialEq)]
pub struct Words<'a> {
    tokens: Vec<&'a str>,
    separator: &'static str,
}

impl<'a> Words<'a> {
    /// Split `text` into units.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::fitting::Words;
    ///
    /// let words = Words::split("two words");
    /// assert_eq!(words.tokens(), &["two", "words"]);
    ///
    /// let words = Words::split("日本語");
    /// assert_eq!(words.tokens(), &["日", "本", "語"]);
    /// assert_eq!(words.separator(), "");
    /// ```
    pub fn split(text: &'a str) -> Self {
        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        let cjk = text.chars().filter(|c| is_cjk_char(*c)).count();

        if visible > 0 && cjk * 2 > visible {
            let tokens = text
                .char_indices()
                .filter(|(_, c)| !c.is_whitespace())
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect();
            Self {
                tokens,
                separator: "",
            }
        } else {
            Self {
                tokens: text.split_whitespace().collect(),
                separator: " ",
            }
        }
    }

    /// Units in order.
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// String placed between units on one line.
    pub fn separator(&self) -> &'static str {
        self.separator
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when there is nothing to wrap.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lines produced by one wrapping pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrapOutcome {
    /// Wrapped lines
    pub lines: Vec<String>,
    /// Units were left over once every line was used
    pub is_truncated: bool,
}

/// Wraps units into lines of a fixed width at one font size.
#[derive(Debug, Clone, Copy)]
pub struct LineWrapper<'m> {
    model: &'m WidthModel,
    font_size: f32,
    available_width: f32,
    margin: f32,
    break_words: bool,
}

impl<'m> LineWrapper<'m> {
    /// Create a wrapper for a box `available_width` points wide.
    pub fn new(model: &'m WidthModel, font_size: f32, available_width: f32) -> Self {
        Self {
            model,
            font_size,
            available_width,
            margin: WIDTH_SAFETY_MARGIN,
            break_words: false,
        }
    }

    /// Set the share of the width a line may fill.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Split words wider than a line into hyphenated chunks.
    pub fn with_word_breaking(mut self, enable: bool) -> Self {
        self.break_words = enable;
        self
    }

    /// Font size lines are measured at.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Widest allowed line.
    pub fn limit(&self) -> f32 {
        self.available_width * self.margin
    }

    /// Estimated width of `text`.
    pub fn width(&self, text: &str) -> f32 {
        self.model.text_width(text, self.font_size)
    }

    /// Line width as a percentage of the box width.
    pub fn utilization(&self, line: &str) -> f32 {
        self.width(line) / self.available_width * 100.0
    }

    /// Fill at most `max_lines` lines greedily.
    pub fn wrap(&self, words: &Words<'_>, max_lines: usize) -> WrapOutcome {
        let max_lines = max_lines.max(1);
        let limit = self.limit();
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut is_truncated = false;

        'words: for word in words.tokens() {
            if !current.is_empty() {
                let candidate = format!("{}{}{}", current, words.separator(), word);
                if self.width(&candidate) <= limit {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }

            if lines.len() >= max_lines {
                is_truncated = true;
                break;
            }

            if self.width(word) <= limit {
                current.push_str(word);
            } else if self.break_words {
                let mut chunks = self.break_word(word);
                let tail = chunks.pop().unwrap_or_default();
                for chunk in chunks {
                    lines.push(chunk);
                    if lines.len() >= max_lines {
                        is_truncated = true;
                        break 'words;
                    }
                }
                current = tail;
            } else {
                // overflows the box on a line of its own
                lines.push((*word).to_string());
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }

        WrapOutcome {
            lines,
            is_truncated,
        }
    }

    /// Split an overlong word into chunks that end in `-`, except the last.
    pub fn break_word(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let per_line =
            (self.available_width * BREAK_MARGIN / self.model.char_width(self.font_size)).floor();
        // room for the hyphen
        let take = if per_line.is_finite() && per_line >= 2.0 {
            per_line as usize - 1
        } else {
            1
        };

        if chars.len() <= take {
            return vec![word.to_string()];
        }

        let mut chunks: Vec<String> = chars.chunks(take).map(|c| c.iter().collect()).collect();
        let last = chunks.len() - 1;
        for chunk in &mut chunks[..last] {
            chunk.push('-');
        }
        chunks
    }

    /// Re-wrap unevenly filled lines with a tighter margin.
    ///
    /// Returns the new lines only when they use no more lines than before and
    /// raise the least filled line's utilisation.
    pub fn rebalance(&self, words: &Words<'_>, lines: &[String]) -> Option<Vec<String>> {
        if lines.len() < 2 {
            return None;
        }

        let (min_util, max_util) = self.utilization_range(lines);
        if max_util - min_util <= REBALANCE_SPREAD || min_util >= UNDERFILLED_UTILIZATION {
            return None;
        }

        let candidate = self
            .with_margin(REBALANCE_MARGIN)
            .wrap(words, words.len().max(1));
        if candidate.lines.len() > lines.len() {
            return None;
        }

        let (new_min, new_max) = self.utilization_range(&candidate.lines);
        log::debug!(
            "Rebalance: utilisation {:.1}%..{:.1}% -> {:.1}%..{:.1}%",
            min_util,
            max_util,
            new_min,
            new_max
        );
        (new_min > min_util).then_some(candidate.lines)
    }

    fn utilization_range(&self, lines: &[String]) -> (f32, f32) {
        lines
            .iter()
            .map(|line| self.utilization(line))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), u| {
                (lo.min(u), hi.max(u))
            })
    }
}
