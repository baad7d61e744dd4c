//! Character encoding detection, transcoding, and mojibake repair.
//!
//! Description documents are served with inconsistent charsets: some declare
//! windows-1252 in a meta tag, and some carry UTF-8 text that was already
//! decoded as Latin-1/CP-1252 once upstream (mojibake). This module detects
//! declared charsets for the fetcher and repairs double-encoded text for the
//! grammars that need it.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Known garbled sequences left by a UTF-8 byte stream read as CP-1252.
///
/// Applied after the best-effort re-decode for text that mixes clean and
/// corrupted characters (where a whole-string re-decode is impossible).
const GARBLED_SEQUENCES: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"), // a^ euro tm       => right single quote
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),  // a^ euro tilde    => left single quote
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),  // a^ euro oe       => left double quote
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),   // a^ euro control  => right double quote
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"), // a^ euro ldquo    => en dash
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"), // a^ euro rdquo    => em dash
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),   // a^ euro brokebar => ellipsis
    ("\u{e2}\u{201e}\u{a2}", "\u{2122}"),   // a^ dbquote cent  => trademark
    ("\u{c2}\u{ae}", "\u{ae}"),             // A^ reg           => registered
    ("\u{c2}\u{a9}", "\u{a9}"),             // A^ copy          => copyright
    ("\u{c2}\u{b0}", "\u{b0}"),             // A^ deg           => degree
    ("\u{c2}\u{b7}", "\u{b7}"),             // A^ middot        => middle dot
    ("\u{c2}\u{a0}", " "),                  // A^ nbsp          => plain space
    ("\u{c3}\u{a9}", "\u{e9}"),             // A~ copy          => e acute
    ("\u{c3}\u{a8}", "\u{e8}"),             // A~ diaeresis     => e grave
    ("\u{c3}\u{bc}", "\u{fc}"),             // A~ fraction      => u umlaut
];

/// First characters of every garbled sequence; used as a fast signature test.
const MOJIBAKE_SIGNS: &[char] = &['\u{e2}', '\u{c2}', '\u{c3}'];

/// Detect character encoding from HTML bytes.
///
/// Looks for charset declarations in the following order:
/// 1. `<meta charset="...">`
/// 2. `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 3. Defaults to UTF-8 if no declaration found
///
/// Only examines the first 1024 bytes for performance.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(charset) = extract_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    if let Some(charset) = extract_content_type_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    UTF_8
}

/// Extract charset from `<meta charset="...">` tag.
fn extract_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract charset from `<meta http-equiv="Content-Type" content="...; charset=...">` tag.
fn extract_content_type_charset(html: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode HTML bytes to a UTF-8 string using the declared charset.
///
/// Invalid sequences are replaced, never raised.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}

/// Best-effort repair of text double-encoded through a CP-1252 path.
///
/// When every character of the text maps back to a CP-1252 byte, the text is
/// re-encoded and re-read as UTF-8; if that yields valid UTF-8 the re-decode
/// is accepted wholesale. Text that mixes corrupted and genuine non-Latin-1
/// characters cannot be re-decoded that way, so the known garbled sequences
/// are replaced individually afterwards.
#[must_use]
pub fn repair_mojibake(text: &str) -> String {
    if !text.contains(MOJIBAKE_SIGNS) {
        return text.to_string();
    }

    let mut repaired = redecode_cp1252(text).unwrap_or_else(|| text.to_string());

    for (garbled, replacement) in GARBLED_SEQUENCES {
        if repaired.contains(garbled) {
            repaired = repaired.replace(garbled, replacement);
        }
    }

    // A successful re-decode restores real non-breaking spaces; flatten them
    // like the sequence table does.
    if repaired.contains('\u{a0}') {
        repaired = repaired.replace('\u{a0}', " ");
    }

    repaired
}

/// Re-encode as CP-1252 bytes and re-decode as UTF-8, if lossless.
fn redecode_cp1252(text: &str) -> Option<String> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        return None;
    }

    let decoded = String::from_utf8(bytes.into_owned()).ok()?;
    // Accept the re-decode only when it removed mojibake signatures rather
    // than producing new replacement characters.
    if decoded.contains('\u{fffd}') || decoded.contains(MOJIBAKE_SIGNS) {
        return None;
    }
    Some(decoded)
}
