//! Namespace and subpath segment handling.
//!
//! Parsing a string is lenient: empty segments are dropped everywhere and
//! subpath `.`/`..` segments are dropped too. Construction from components is
//! strict about subpath dot segments.

use crate::codec::percent_decode;
use crate::components::Component;
use crate::error::{ErrorKind, SegmentError};

/// Decodes a raw namespace, dropping empty segments.
///
/// Dot segments are kept verbatim; they carry meaning in some ecosystems.
pub(crate) fn decode_namespace(raw: &str) -> Result<Option<String>, ErrorKind> {
    decode_segments(raw, Component::Namespace, |_| false)
}

/// Decodes a raw subpath, dropping empty, `.` and `..` segments.
pub(crate) fn decode_subpath(raw: &str) -> Result<Option<String>, ErrorKind> {
    decode_segments(raw, Component::Subpath, is_dot_segment)
}

/// Normalizes a caller-supplied namespace.
pub(crate) fn namespace_from_arg(namespace: &str) -> Option<String> {
    join(namespace.split('/').filter(|s| !s.is_empty()).map(str::to_string))
}

/// Normalizes a caller-supplied subpath, rejecting dot segments.
pub(crate) fn subpath_from_arg(subpath: &str) -> Result<Option<String>, ErrorKind> {
    let mut segments = Vec::new();
    for segment in subpath.split('/').filter(|s| !s.is_empty()) {
        if is_dot_segment(segment) {
            return Err(ErrorKind::InvalidSegment {
                component: Component::Subpath,
                error: SegmentError::DotSegment {
                    segment: segment.to_string(),
                },
            });
        }
        segments.push(segment.to_string());
    }
    Ok(join(segments))
}

/// Checks that a `/`-joined value has no empty segments, and for subpaths no
/// dot segments.
pub(crate) fn check_joined(value: &str, component: Component) -> Result<(), ErrorKind> {
    for segment in value.split('/') {
        if segment.is_empty() {
            return Err(ErrorKind::InvalidSegment {
                component,
                error: SegmentError::Empty,
            });
        }
        if component == Component::Subpath && is_dot_segment(segment) {
            return Err(ErrorKind::InvalidSegment {
                component,
                error: SegmentError::DotSegment {
                    segment: segment.to_string(),
                },
            });
        }
    }
    Ok(())
}

fn decode_segments(
    raw: &str,
    component: Component,
    skip: fn(&str) -> bool,
) -> Result<Option<String>, ErrorKind> {
    let mut segments = Vec::new();

    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        let decoded = percent_decode(segment)
            .map_err(|error| ErrorKind::InvalidEncoding { component, error })?;

        if decoded.contains('/') {
            return Err(ErrorKind::InvalidSegment {
                component,
                error: SegmentError::ContainsSlash {
                    segment: decoded.into_owned(),
                },
            });
        }

        if decoded.is_empty() || skip(&decoded) {
            continue;
        }

        segments.push(decoded.into_owned());
    }

    Ok(join(segments))
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

fn join<I>(segments: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let joined = segments.into_iter().collect::<Vec<_>>().join("/");
    (!joined.is_empty()).then_some(joined)
}
