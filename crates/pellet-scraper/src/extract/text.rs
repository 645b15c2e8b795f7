//! Text normalization and Polish-locale number parsing shared by the
//! extraction strategies.

use regex::Regex;

/// Collapses runs of whitespace (including NBSP) to single spaces and trims.
#[must_use]
pub(crate) fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Parses the first decimal number from a Polish-formatted numeric string.
///
/// Spaces and NBSPs are thousands separators, commas are decimal points:
/// `"1 845,00"` parses as `1845.0`.
#[must_use]
pub(crate) fn parse_float_pl(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let re = Regex::new(r"\d+(?:\.\d+)?").expect("valid regex");
    re.find(&cleaned)?.as_str().parse::<f64>().ok()
}
