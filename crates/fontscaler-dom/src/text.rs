//! Deterministic text measurement for the headless host.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

pub mod wrap;

pub use wrap::{collapse_whitespace, wrap_text_lines};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
    /// Resolved `line-height` in px; `None` means the measurer's `normal`.
    pub line_height: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
            line_height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    /// Measures `text` without wrapping; `\n` starts a new line.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Height of one line box.
    fn line_height(&self, style: &TextStyle) -> f64;

    /// Measures `text` greedily wrapped at `max_width_px`.
    fn measure_wrapped(
        &self,
        text: &str,
        style: &TextStyle,
        max_width_px: Option<f64>,
    ) -> TextMetrics {
        let lines = wrap_text_lines(text, self, style, max_width_px);
        let width = lines
            .iter()
            .map(|l| self.measure(l, style).width)
            .fold(0.0, f64::max);
        TextMetrics {
            width,
            height: lines.len() as f64 * self.line_height(style),
            line_count: lines.len(),
        }
    }
}

/// Fixed-advance measurer: every character has a width in em, every line the same height.
///
/// With `char_width_factor == 0.0` ASCII characters use a per-class advance table; otherwise
/// every column is `char_width_factor` em wide. Wide (East Asian) characters take two columns.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn monospace(char_width_factor: f64, line_height_factor: f64) -> Self {
        Self {
            char_width_factor,
            line_height_factor,
        }
    }

    fn char_width_em(&self, ch: char) -> f64 {
        let columns = ch.width().unwrap_or(0) as f64;
        if self.char_width_factor != 0.0 {
            return self.char_width_factor * columns;
        }
        if ch.is_ascii() {
            ascii_advance_em(ch)
        } else {
            0.6 * columns
        }
    }

    pub fn line_width_px(&self, line: &str, font_size: f64) -> f64 {
        let em: f64 = line.chars().map(|ch| self.char_width_em(ch)).sum();
        em * font_size
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let font_size = style.font_size.max(0.0);
        let lines = text.split('\n').collect::<Vec<_>>();
        let width = lines
            .iter()
            .map(|l| self.line_width_px(l, font_size))
            .fold(0.0, f64::max);
        TextMetrics {
            width,
            height: lines.len() as f64 * self.line_height(style),
            line_count: lines.len(),
        }
    }

    fn line_height(&self, style: &TextStyle) -> f64 {
        let factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };
        style
            .line_height
            .unwrap_or(style.font_size.max(0.0) * factor)
    }
}

/// Advance (em) of an ASCII character in a generic proportional sans face, grouped by glyph
/// class rather than per glyph.
fn ascii_advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '!' | '\'' | '|' | '.' | ',' | ':' | ';' => 0.25,
        ' ' | '-' | '_' | 'f' | 'r' | 't' | 'I' | '(' | ')' | '[' | ']' | '{' | '}' | '/' => 0.33,
        'm' | 'M' | 'W' => 0.83,
        'w' => 0.72,
        'A'..='Z' => 0.65,
        '0'..='9' => 0.55,
        'a'..='z' => 0.5,
        '\t' => 1.0,
        _ => 0.55,
    }
}
