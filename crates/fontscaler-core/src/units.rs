//! CSS number helpers shared by the core and the hosts.

use ryu_js::Buffer;

/// Parses the leading number of a CSS value the way `parseFloat` does.
///
/// `"16px"` -> `16.0`, `" 12.5rem"` -> `12.5`, `"-3e1px"` -> `-30.0`. Returns `None` when the
/// value does not start with a number (after leading whitespace).
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    split_leading_number(raw).map(|(v, _)| v)
}

/// Like [`parse_leading_number`], also returning the unparsed remainder (the unit).
pub fn split_leading_number(raw: &str) -> Option<(f64, &str)> {
    let s = raw.trim_start();
    let b = s.as_bytes();
    let mut i = 0usize;

    if i < b.len() && matches!(b[i], b'+' | b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    // An exponent only counts when at least one digit follows it.
    if i < b.len() && matches!(b[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < b.len() && matches!(b[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let v = s[..i].parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some((v, &s[i..]))
}

/// Parses a styling variable into a number, treating absent or blank values as missing.
pub fn parse_style_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    parse_leading_number(raw)
}

/// Formats a pixel length as a CSS declaration value (`11.0` -> `"11px"`).
pub fn px(v: f64) -> String {
    let mut b = Buffer::new();
    if v.is_finite() {
        format!("{}px", b.format_finite(v))
    } else {
        "0px".to_string()
    }
}
