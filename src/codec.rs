//! Byte and character level helpers shared by the parser and canonicalizer.
//!
//! Nothing in this module consults the host locale. Case folding only ever
//! touches ASCII `A-Z`, so canonical strings are identical on every machine.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::DecodeError;

/// Every byte except `[A-Za-z0-9._~-]` is escaped.
const PURL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'-');

/// Percent-encodes every byte outside the unreserved set.
///
/// Escapes use uppercase hex digits. Input that needs no escaping is returned
/// borrowed.
///
/// # Examples
///
/// ```
/// use pkg_url::codec::percent_encode;
///
/// assert_eq!(percent_encode("@angular"), "%40angular");
/// assert_eq!(percent_encode("1.0.0~rc1"), "1.0.0~rc1");
/// assert_eq!(percent_encode("ü"), "%C3%BC");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, PURL_ENCODE_SET).into()
}

/// Decodes `%XX` escapes and reinterprets the result as UTF-8.
///
/// Unlike lenient URL decoders, a `%` that is not followed by exactly two hex
/// digits is an error.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidEscape`] with the byte offset of the `%` and
/// the offending fragment, or [`DecodeError::InvalidUtf8`] if the decoded bytes
/// are not UTF-8.
///
/// # Examples
///
/// ```
/// use pkg_url::codec::percent_decode;
///
/// assert_eq!(percent_decode("%40angular").unwrap(), "@angular");
/// assert!(percent_decode("abc%4").is_err());
/// ```
pub fn percent_decode(input: &str) -> Result<Cow<'_, str>, DecodeError> {
    if !input.contains('%') {
        return Ok(Cow::Borrowed(input));
    }

    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            decoded.push(bytes[i]);
            i += 1;
            continue;
        }

        let escape = bytes.get(i + 1..i + 3);
        let value = escape.and_then(|pair| Some((hex_value(pair[0])? << 4) | hex_value(pair[1])?));
        let Some(value) = value else {
            let end = (i + 3).min(bytes.len());
            return Err(DecodeError::InvalidEscape {
                offset: i,
                fragment: String::from_utf8_lossy(&bytes[i..end]).into_owned(),
            });
        };

        decoded.push(value);
        i += 3;
    }

    String::from_utf8(decoded)
        .map(Cow::Owned)
        .map_err(|e| DecodeError::InvalidUtf8 {
            input: input.to_string(),
            valid_up_to: e.utf8_error().valid_up_to(),
        })
}

/// Folds ASCII `A-Z` to `a-z` and leaves every other character untouched.
///
/// # Examples
///
/// ```
/// use pkg_url::codec::to_lower_ascii;
///
/// assert_eq!(to_lower_ascii("KEY"), "key");
/// // Non-ASCII letters are not folded, whatever the host locale says.
/// assert_eq!(to_lower_ascii("İSTANBUL"), "İstanbul");
/// ```
#[must_use]
pub fn to_lower_ascii(input: &str) -> Cow<'_, str> {
    if input.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(input.to_ascii_lowercase())
    } else {
        Cow::Borrowed(input)
    }
}

/// Returns true for ASCII `0-9`.
#[must_use]
pub const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Returns true for ASCII `A-Z` and `a-z`.
#[must_use]
pub const fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Returns true if the character may appear in a package type.
#[must_use]
pub const fn is_type_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')
}

/// Returns true if the character may appear in a qualifier key.
#[must_use]
pub const fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Returns true if the character never needs percent-encoding.
#[must_use]
pub const fn is_unreserved(c: char) -> bool {
    is_key_char(c) || c == '~'
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
