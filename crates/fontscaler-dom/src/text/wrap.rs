//! Greedy word wrapping over the layout's collapsed text runs.

use super::{TextMeasurer, TextStyle};

/// Collapses every run of whitespace (newlines included) into a single space, the way
/// `white-space: normal` renders text nodes.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Wraps `text` into lines no wider than `max_width_px`.
///
/// `\n` (a `<br>` in the run) forces a break. Words that do not fit on an empty line are broken
/// between characters. Without a usable width every `\n`-separated line is returned as is
/// (trimmed).
pub fn wrap_text_lines<M: TextMeasurer + ?Sized>(
    text: &str,
    measurer: &M,
    style: &TextStyle,
    max_width_px: Option<f64>,
) -> Vec<String> {
    let Some(max_width) = max_width_px.filter(|w| w.is_finite() && *w > 0.0) else {
        return text.split('\n').map(|l| l.trim().to_string()).collect();
    };
    let mut breaker = LineBreaker {
        measurer,
        style,
        max_width,
        lines: Vec::new(),
        current: String::new(),
    };
    for segment in text.split('\n') {
        breaker.break_segment(segment);
    }
    breaker.lines
}

struct LineBreaker<'a, M: ?Sized> {
    measurer: &'a M,
    style: &'a TextStyle,
    max_width: f64,
    lines: Vec<String>,
    current: String,
}

impl<M: TextMeasurer + ?Sized> LineBreaker<'_, M> {
    fn fits(&self, line: &str) -> bool {
        self.measurer.measure(line, self.style).width <= self.max_width
    }

    /// Lays out one forced-break segment; an empty segment still yields one (empty) line box.
    fn break_segment(&mut self, segment: &str) {
        let before = self.lines.len();
        for word in segment.split_whitespace() {
            self.place(word);
        }
        self.finish_line();
        if self.lines.len() == before {
            self.lines.push(String::new());
        }
    }

    fn place(&mut self, word: &str) {
        if !self.current.is_empty() {
            let candidate = format!("{} {word}", self.current);
            if self.fits(&candidate) {
                self.current = candidate;
                return;
            }
            self.finish_line();
        }
        if self.fits(word) {
            self.current.push_str(word);
        } else {
            self.break_word(word);
        }
    }

    /// Emits full-width slices of `word`; the remainder opens the next line.
    fn break_word(&mut self, word: &str) {
        let mut slice = String::new();
        for ch in word.chars() {
            slice.push(ch);
            if slice.chars().nth(1).is_some() && !self.fits(&slice) {
                slice.pop();
                self.lines.push(std::mem::take(&mut slice));
                slice.push(ch);
            }
        }
        self.current = slice;
    }

    fn finish_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }
}
