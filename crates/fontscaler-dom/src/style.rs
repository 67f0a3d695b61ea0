//! Inline style declarations and the small subset of CSS value resolution the layout needs.

use crate::{Error, Result};
use fontscaler_core::units::split_leading_number;
use indexmap::IndexMap;

/// Initial value of `font-size` (`medium`).
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Properties whose computed value is inherited from the parent when not declared.
/// Custom properties (`--*`) always inherit.
pub const INHERITED_PROPERTIES: &[&str] = &[
    "font-size",
    "font-family",
    "font-weight",
    "line-height",
    "visibility",
];

/// Ordered inline declarations, property names lower-cased (custom properties keep their case).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarations {
    decls: IndexMap<String, String>,
}

impl StyleDeclarations {
    /// Parses a `style` attribute (`"font-size: 12px; --fontScalerHeight: 100px"`).
    pub fn parse(css_text: &str) -> Result<Self> {
        let mut out = Self::default();
        for decl in css_text.split(';') {
            if decl.trim().is_empty() {
                continue;
            }
            let Some((name, value)) = decl.split_once(':') else {
                return Err(Error::InvalidStyle {
                    declaration: decl.trim().to_string(),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidStyle {
                    declaration: decl.trim().to_string(),
                });
            }
            out.set(name, value);
        }
        Ok(out)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.decls
            .insert(normalize_property_name(name), value.trim().to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.decls
            .get(normalize_property_name(name).as_str())
            .map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.decls.shift_remove(normalize_property_name(name).as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes back to `style` attribute text.
    pub fn css_text(&self) -> String {
        self.decls
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn normalize_property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

pub fn is_inherited(property: &str) -> bool {
    property.starts_with("--") || INHERITED_PROPERTIES.contains(&property)
}

fn split_number_unit(value: &str) -> Option<(f64, String)> {
    let (n, unit) = split_leading_number(value.trim())?;
    Some((n, unit.trim().to_ascii_lowercase()))
}

/// Resolves a declared `font-size` against the parent's and the root's computed sizes.
/// Returns `None` for values the cascade should ignore.
pub fn resolve_font_size(value: &str, parent_px: f64, root_px: f64) -> Option<f64> {
    let keyword = value.trim().to_ascii_lowercase();
    let keyword_px = match keyword.as_str() {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(DEFAULT_FONT_SIZE_PX),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        "smaller" => Some(parent_px / 1.2),
        "larger" => Some(parent_px * 1.2),
        "inherit" => Some(parent_px),
        _ => None,
    };
    if keyword_px.is_some() {
        return keyword_px;
    }

    let (n, unit) = split_number_unit(&keyword)?;
    if n < 0.0 {
        return None;
    }
    match unit.as_str() {
        "px" => Some(n),
        "em" => Some(n * parent_px),
        "rem" => Some(n * root_px),
        "%" => Some(n / 100.0 * parent_px),
        "pt" => Some(n * 96.0 / 72.0),
        "" if n == 0.0 => Some(0.0),
        _ => None,
    }
}

/// Resolves a `width`/`height` declaration. `auto` and unresolvable percentages yield `None`.
pub fn resolve_length(
    value: &str,
    font_px: f64,
    root_px: f64,
    percent_base: Option<f64>,
) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    if value == "auto" {
        return None;
    }
    let (n, unit) = split_number_unit(&value)?;
    let px = match unit.as_str() {
        "px" => n,
        "em" => n * font_px,
        "rem" => n * root_px,
        "%" => n / 100.0 * percent_base?,
        "pt" => n * 96.0 / 72.0,
        "" if n == 0.0 => 0.0,
        _ => return None,
    };
    Some(px.max(0.0))
}

/// Resolves `line-height`: unitless numbers scale the font size, `normal` defers to the
/// measurer.
pub fn resolve_line_height(value: &str, font_px: f64, root_px: f64) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    if value == "normal" {
        return None;
    }
    let (n, unit) = split_number_unit(&value)?;
    if unit.is_empty() {
        return Some(n * font_px);
    }
    resolve_length(&value, font_px, root_px, Some(font_px))
}
