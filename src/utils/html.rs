//! HTML escaping for the page DOM.
//!
//! Text nodes and attribute values are stored in source form, so one
//! escaper serves both. Attribute values are always written double-quoted.

use std::borrow::Cow;

/// Longest reference `unescape` looks at, `&` and `;` excluded.
const MAX_REFERENCE_LEN: usize = 10;

#[inline]
const fn entity(b: u8) -> Option<&'static str> {
    match b {
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'&' => Some("&amp;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape markup characters for text content or a quoted attribute value.
///
/// Borrows when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    let Some(first) = s.bytes().position(|b| entity(b).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 16);
    let mut copied = 0;
    // Escaped bytes are ASCII, so every cut is a char boundary
    for (i, b) in s.bytes().enumerate().skip(first) {
        if let Some(e) = entity(b) {
            out.push_str(&s[copied..i]);
            out.push_str(e);
            copied = i + 1;
        }
    }
    out.push_str(&s[copied..]);
    Cow::Owned(out)
}

/// Decode character references.
///
/// Knows what `escape` emits plus `&apos;`, `&nbsp;` and numeric references.
/// Anything else, terminated or not, is kept as written.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_reference(rest) {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode the reference at the start of `s` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed.
fn decode_reference(s: &str) -> Option<(char, usize)> {
    let (semi, _) = s[1..]
        .char_indices()
        .take(MAX_REFERENCE_LEN + 1)
        .find(|&(_, c)| c == ';')?;
    let name = &s[1..=semi];

    let c = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((c, semi + 2))
}

/// Elements serialized without children or a closing tag.
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}
