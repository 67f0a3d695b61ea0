//! Block/inline layout just deep enough to answer "how tall is this element at this width".
//!
//! Blocks stack vertically and take their containing block's width. Text nodes and inline
//! elements (`span`, `b`, ... or `display: inline`) form anonymous line runs that wrap at the
//! block's content width. `position: absolute|fixed` children are out of flow: they do not
//! contribute to their parent's height, and without an explicit `width` they shrink to fit.
//! There are no margins, borders or paddings.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};
use crate::style::{self, DEFAULT_FONT_SIZE_PX};
use crate::text::{TextStyle, collapse_whitespace};

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "cite", "code", "em", "i", "kbd", "mark", "q", "s", "small", "span",
    "strong", "sub", "sup", "u",
];

impl Document {
    /// Computed `font-size` in px.
    pub fn font_size_px(&self, id: NodeId) -> f64 {
        let Some(data) = self.data(id) else {
            return DEFAULT_FONT_SIZE_PX;
        };
        let inherited = match data.parent {
            Some(p) => self.font_size_px(p),
            None if id == self.root() => DEFAULT_FONT_SIZE_PX,
            None => self.root_font_size_px(),
        };
        data.style
            .get("font-size")
            .and_then(|v| style::resolve_font_size(v, inherited, self.root_font_size_px()))
            .unwrap_or(inherited)
    }

    fn root_font_size_px(&self) -> f64 {
        self.data(self.root())
            .and_then(|d| d.style.get("font-size"))
            .and_then(|v| {
                style::resolve_font_size(v, DEFAULT_FONT_SIZE_PX, DEFAULT_FONT_SIZE_PX)
            })
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    fn is_displayed(&self, id: NodeId) -> bool {
        self.style(id, "display")
            .is_none_or(|d| !d.eq_ignore_ascii_case("none"))
    }

    fn is_out_of_flow(&self, id: NodeId) -> bool {
        self.style(id, "position").is_some_and(|p| {
            p.eq_ignore_ascii_case("absolute") || p.eq_ignore_ascii_case("fixed")
        })
    }

    fn is_inline(&self, id: NodeId) -> bool {
        if let Some(display) = self.style(id, "display") {
            return display.trim().to_ascii_lowercase().starts_with("inline");
        }
        self.kind(id)
            .and_then(NodeKind::tag)
            .is_some_and(|tag| INLINE_TAGS.contains(&tag))
    }

    fn containing_width(&self, id: NodeId) -> f64 {
        match self.parent(id) {
            Some(p) if p != self.root() => self.content_width(p),
            _ => self.viewport_width(),
        }
    }

    /// Content-box width.
    pub fn content_width(&self, id: NodeId) -> f64 {
        if id == self.root() || !self.contains(id) {
            return self.viewport_width();
        }
        let containing = self.containing_width(id);
        let explicit = self.style(id, "width").and_then(|w| {
            style::resolve_length(
                w,
                self.font_size_px(id),
                self.root_font_size_px(),
                Some(containing),
            )
        });
        if let Some(w) = explicit {
            return w;
        }
        if self.is_out_of_flow(id) {
            return self.max_content_width(id).min(containing);
        }
        containing
    }

    /// Content-box height, wrapped lines included. Each call is one layout pass.
    pub fn content_height(&self, id: NodeId) -> f64 {
        self.layout_passes.set(self.layout_passes.get() + 1);
        self.block_height(id)
    }

    fn explicit_height(&self, id: NodeId) -> Option<f64> {
        let value = self.style(id, "height")?;
        let percent_base = self
            .parent(id)
            .filter(|p| *p != self.root())
            .and_then(|p| self.explicit_height(p));
        style::resolve_length(
            value,
            self.font_size_px(id),
            self.root_font_size_px(),
            percent_base,
        )
    }

    fn block_height(&self, id: NodeId) -> f64 {
        if !self.contains(id) {
            return 0.0;
        }
        if let Some(h) = self.explicit_height(id) {
            return h;
        }
        let width = self.content_width(id);
        let mut total = 0.0;
        let mut run = String::new();
        for child in self.children(id) {
            match self.kind(*child) {
                Some(NodeKind::Text(t)) => run.push_str(&collapse_whitespace(t)),
                Some(NodeKind::Element { .. }) => {
                    if !self.is_displayed(*child) || self.is_out_of_flow(*child) {
                        continue;
                    }
                    if self.is_inline(*child) {
                        self.push_inline_text(*child, &mut run);
                    } else {
                        total += self.run_height(id, &run, width);
                        run.clear();
                        total += self.block_height(*child);
                    }
                }
                _ => {}
            }
        }
        total + self.run_height(id, &run, width)
    }

    fn push_inline_text(&self, id: NodeId, run: &mut String) {
        if self.kind(id).and_then(NodeKind::tag) == Some("br") {
            run.push('\n');
            return;
        }
        for child in self.children(id) {
            match self.kind(*child) {
                Some(NodeKind::Text(t)) => run.push_str(&collapse_whitespace(t)),
                Some(NodeKind::Element { .. }) if self.is_displayed(*child) => {
                    self.push_inline_text(*child, run)
                }
                _ => {}
            }
        }
    }

    pub(crate) fn text_style(&self, id: NodeId) -> TextStyle {
        let font_size = self.font_size_px(id);
        TextStyle {
            font_family: self.computed_value(id, "font-family"),
            font_size,
            font_weight: self.computed_value(id, "font-weight"),
            line_height: self.computed_value(id, "line-height").and_then(|v| {
                style::resolve_line_height(&v, font_size, self.root_font_size_px())
            }),
        }
    }

    fn run_height(&self, owner: NodeId, run: &str, width: f64) -> f64 {
        if run.trim_matches(' ').is_empty() {
            return 0.0;
        }
        self.measurer
            .measure_wrapped(run, &self.text_style(owner), Some(width))
            .height
    }

    /// Width the content would take without any wrapping.
    fn max_content_width(&self, id: NodeId) -> f64 {
        let mut widest: f64 = 0.0;
        let mut run = String::new();
        for child in self.children(id) {
            match self.kind(*child) {
                Some(NodeKind::Text(t)) => run.push_str(&collapse_whitespace(t)),
                Some(NodeKind::Element { .. }) => {
                    if !self.is_displayed(*child) || self.is_out_of_flow(*child) {
                        continue;
                    }
                    if self.is_inline(*child) {
                        self.push_inline_text(*child, &mut run);
                    } else {
                        widest = widest.max(self.run_width(id, &run));
                        run.clear();
                        // Percentages need the containing width, which is what is being
                        // computed here; treat them as auto.
                        let child_width = self
                            .style(*child, "width")
                            .and_then(|w| {
                                style::resolve_length(
                                    w,
                                    self.font_size_px(*child),
                                    self.root_font_size_px(),
                                    None,
                                )
                            })
                            .unwrap_or_else(|| self.max_content_width(*child));
                        widest = widest.max(child_width);
                    }
                }
                _ => {}
            }
        }
        widest.max(self.run_width(id, &run))
    }

    fn run_width(&self, owner: NodeId, run: &str) -> f64 {
        if run.trim_matches(' ').is_empty() {
            return 0.0;
        }
        self.measurer
            .measure_wrapped(run, &self.text_style(owner), None)
            .width
    }
}
