//! Byte-to-text decoding for pages served with unreliable charset metadata.
//!
//! Polish shop pages in scope declare UTF-8 but occasionally ship
//! windows-1250 or ISO-8859-2 bodies, so the declared encoding is treated
//! as a hint rather than a fact.

use encoding_rs::{Encoding, ISO_8859_2, UTF_8, WINDOWS_1250};

/// Fallback code pages common for the target locale, tried after the
/// declared encoding.
const FALLBACK_ENCODINGS: &[&Encoding] = &[UTF_8, WINDOWS_1250, ISO_8859_2];

/// Decodes raw HTML bytes into text, never failing on malformed input.
///
/// Each candidate encoding (declared hint first, then the fixed fallback
/// list) is decoded permissively and scored by the number of U+FFFD
/// replacement characters it produces. The first zero-replacement decode
/// wins outright; otherwise the fewest-replacement candidate is returned.
///
/// Returns the decoded text and its replacement-character count so callers
/// can log degraded decodes.
#[must_use]
pub fn decode_html_bytes(raw: &[u8], declared: Option<&str>) -> (String, usize) {
    let mut candidates: Vec<&'static Encoding> = Vec::with_capacity(4);
    if let Some(label) = declared {
        if let Some(enc) = Encoding::for_label(label.trim().as_bytes()) {
            candidates.push(enc);
        }
    }
    for enc in FALLBACK_ENCODINGS {
        if !candidates.iter().any(|c| c.name() == enc.name()) {
            candidates.push(enc);
        }
    }

    let mut best: Option<(String, usize)> = None;
    for enc in candidates {
        let (text, _, _) = enc.decode(raw);
        let bad = text.matches('\u{FFFD}').count();
        if bad == 0 {
            return (text.into_owned(), 0);
        }
        if best.as_ref().is_none_or(|(_, b)| bad < *b) {
            best = Some((text.into_owned(), bad));
        }
    }

    // Unreachable in practice (the list is never empty), but degrade to a
    // lossy UTF-8 decode rather than panic.
    best.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(raw).into_owned();
        let bad = text.matches('\u{FFFD}').count();
        (text, bad)
    })
}
