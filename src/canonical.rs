//! Canonical string rendering.

use std::fmt::{self, Write};

use crate::codec::percent_encode;
use crate::constants::SCHEME_PREFIX;
use crate::purl::PackageUrl;

/// Which parts of a purl to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Form {
    /// Everything, qualifiers and subpath included
    Full,
    /// Type, namespace, name and version only
    Coordinates,
}

/// Writes the canonical form of a validated purl.
///
/// Qualifiers come out in ascending key order because [`Qualifiers`](crate::Qualifiers)
/// iterates that way; that ordering is what makes the output canonical.
pub(crate) fn write_canonical<W: Write>(out: &mut W, purl: &PackageUrl, form: Form) -> fmt::Result {
    out.write_str(SCHEME_PREFIX)?;
    out.write_str(purl.package_type())?;
    out.write_char('/')?;

    for segment in purl.namespace_segments() {
        write!(out, "{}/", percent_encode(segment))?;
    }
    out.write_str(&percent_encode(purl.name()))?;

    if let Some(version) = purl.version() {
        write!(out, "@{}", percent_encode(version))?;
    }

    if form == Form::Coordinates {
        return Ok(());
    }

    if !purl.qualifiers().is_empty() {
        write!(out, "?{}", purl.qualifiers())?;
    }

    if let Some(subpath) = purl.subpath() {
        out.write_char('#')?;
        write_segments(out, subpath)?;
    }

    Ok(())
}

/// Renders into a fresh string.
pub(crate) fn render(purl: &PackageUrl, form: Form) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_canonical(&mut out, purl, form);
    out
}

fn write_segments<W: Write>(out: &mut W, joined: &str) -> fmt::Result {
    for (i, segment) in joined.split('/').enumerate() {
        if i > 0 {
            out.write_char('/')?;
        }
        out.write_str(&percent_encode(segment))?;
    }
    Ok(())
}
