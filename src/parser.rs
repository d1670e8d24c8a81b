//! Grammar parser: splits a purl string into decoded components.

use crate::codec::{percent_decode, to_lower_ascii};
use crate::components::{Component, Components};
use crate::constants::SCHEME_PREFIX;
use crate::error::ErrorKind;
use crate::path::{decode_namespace, decode_subpath};
use crate::qualifiers::Qualifiers;
use crate::validate::validate_type;

/// Parses a purl string into components.
///
/// The type is folded and validated before anything else is looked at. The
/// result has not been through any type policy yet.
pub(crate) fn parse(input: &str) -> Result<Components, ErrorKind> {
    if input.is_empty() {
        return Err(ErrorKind::Empty);
    }

    let rest = input
        .strip_prefix(SCHEME_PREFIX)
        .ok_or_else(|| ErrorKind::InvalidScheme {
            found: found_scheme(input),
        })?;
    let rest = strip_authority(rest)?;

    let (rest, subpath) = split_off(rest, '#');
    let (path, qualifiers) = split_off(rest, '?');
    let path = path.trim_end_matches('/');

    let (package_type, remainder) = path.split_once('/').unwrap_or((path, ""));
    if package_type.is_empty() {
        return Err(ErrorKind::MissingComponent {
            component: Component::Type,
        });
    }
    validate_type(package_type)?;
    let package_type = to_lower_ascii(package_type).into_owned();

    let (remainder, version) = match remainder.rsplit_once('@') {
        Some((remainder, version)) => (remainder, decode(version, Component::Version)?),
        None => (remainder, None),
    };

    let remainder = remainder.trim_end_matches('/');
    let (namespace, name) = remainder.rsplit_once('/').unwrap_or(("", remainder));
    let name = decode(name, Component::Name)?.ok_or(ErrorKind::MissingComponent {
        component: Component::Name,
    })?;

    Ok(Components {
        package_type,
        namespace: decode_namespace(namespace)?,
        name,
        version,
        qualifiers: qualifiers.map_or_else(|| Ok(Qualifiers::new()), Qualifiers::parse)?,
        subpath: subpath.map(decode_subpath).transpose()?.flatten(),
    })
}

/// Rejects user info or a port after `pkg://`, then skips leading slashes.
fn strip_authority(rest: &str) -> Result<&str, ErrorKind> {
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        let authority = &after[..end];
        if authority.contains(['@', ':']) {
            return Err(ErrorKind::UnexpectedAuthority {
                authority: authority.to_string(),
            });
        }
    }
    Ok(rest.trim_start_matches('/'))
}

fn split_off(input: &str, delimiter: char) -> (&str, Option<&str>) {
    match input.split_once(delimiter) {
        Some((head, tail)) => (head, Some(tail)),
        None => (input, None),
    }
}

fn found_scheme(input: &str) -> Option<String> {
    input
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.is_empty() && !scheme.contains('/'))
        .map(str::to_string)
}

/// Decodes a single component; an empty result is treated as absent.
fn decode(raw: &str, component: Component) -> Result<Option<String>, ErrorKind> {
    let decoded =
        percent_decode(raw).map_err(|error| ErrorKind::InvalidEncoding { component, error })?;
    Ok((!decoded.is_empty()).then(|| decoded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, QualifierError, TypeError};

    #[test]
    fn parse_all_components() {
        let parts = parse("pkg:deb/debian/curl@7.50.3-1?arch=i386&distro=jessie#usr/bin").unwrap();
        assert_eq!(parts.package_type, "deb");
        assert_eq!(parts.namespace.as_deref(), Some("debian"));
        assert_eq!(parts.name, "curl");
        assert_eq!(parts.version.as_deref(), Some("7.50.3-1"));
        assert_eq!(parts.qualifiers.get("arch"), Some("i386"));
        assert_eq!(parts.subpath.as_deref(), Some("usr/bin"));
    }

    #[test]
    fn parse_empty_fails() {
        assert_eq!(parse(""), Err(ErrorKind::Empty));
    }

    #[test]
    fn parse_wrong_scheme_fails() {
        assert_eq!(
            parse("http://example.com/a"),
            Err(ErrorKind::InvalidScheme {
                found: Some("http".to_string())
            })
        );
        assert_eq!(parse("npm/foo"), Err(ErrorKind::InvalidScheme { found: None }));
    }

    #[test]
    fn parse_scheme_is_case_sensitive() {
        assert!(matches!(parse("PKG:npm/foo"), Err(ErrorKind::InvalidScheme { .. })));
    }

    #[test]
    fn parse_skips_leading_slashes() {
        let a = parse("pkg:///npm/foo").unwrap();
        let b = parse("pkg:npm/foo").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_authority_without_userinfo_is_skipped() {
        let parts = parse("pkg://npm/foo").unwrap();
        assert_eq!(parts.package_type, "npm");
        assert_eq!(parts.name, "foo");
    }

    #[test]
    fn parse_userinfo_fails() {
        assert_eq!(
            parse("pkg://user@generic/name"),
            Err(ErrorKind::UnexpectedAuthority {
                authority: "user@generic".to_string()
            })
        );
    }

    #[test]
    fn parse_port_fails() {
        assert!(matches!(
            parse("pkg://generic:8080/name"),
            Err(ErrorKind::UnexpectedAuthority { .. })
        ));
    }

    #[test]
    fn parse_missing_type_fails() {
        assert_eq!(
            parse("pkg:"),
            Err(ErrorKind::MissingComponent {
                component: Component::Type
            })
        );
        assert_eq!(
            parse("pkg:/name"),
            Err(ErrorKind::MissingComponent {
                component: Component::Name
            })
        );
    }

    #[test]
    fn parse_missing_name_fails() {
        assert_eq!(
            parse("pkg:npm"),
            Err(ErrorKind::MissingComponent {
                component: Component::Name
            })
        );
        assert_eq!(
            parse("pkg:npm/"),
            Err(ErrorKind::MissingComponent {
                component: Component::Name
            })
        );
    }

    #[test]
    fn parse_type_is_folded() {
        assert_eq!(parse("pkg:NPM/foo").unwrap().package_type, "npm");
    }

    #[test]
    fn parse_invalid_type_fails_before_qualifiers() {
        let result = parse("pkg:n_pm/foo?a=1&A=2");
        assert!(matches!(result, Err(ErrorKind::InvalidType(TypeError::InvalidChar { .. }))));
    }

    #[test]
    fn parse_numeric_type_fails() {
        assert!(matches!(
            parse("pkg:3d/model"),
            Err(ErrorKind::InvalidType(TypeError::LeadingDigit { .. }))
        ));
    }

    #[test]
    fn parse_duplicate_qualifier_fails() {
        assert_eq!(
            parse("pkg:generic/name?key=one&KEY=two"),
            Err(ErrorKind::InvalidQualifier(QualifierError::DuplicateKey {
                key: "key".to_string()
            }))
        );
    }

    #[test]
    fn parse_version_after_last_at() {
        let parts = parse("pkg:generic/name@1.0@beta").unwrap();
        assert_eq!(parts.name, "name@1.0");
        assert_eq!(parts.version.as_deref(), Some("beta"));
    }

    #[test]
    fn parse_empty_version_is_absent() {
        assert_eq!(parse("pkg:generic/name@").unwrap().version, None);
    }

    #[test]
    fn parse_trailing_slashes_are_trimmed() {
        let parts = parse("pkg:generic/ns/name/").unwrap();
        assert_eq!(parts.namespace.as_deref(), Some("ns"));
        assert_eq!(parts.name, "name");
    }

    #[test]
    fn parse_decodes_name_and_version() {
        let parts = parse("pkg:npm/%40angular/animation@12.3.1%2Bbuild").unwrap();
        assert_eq!(parts.namespace.as_deref(), Some("@angular"));
        assert_eq!(parts.version.as_deref(), Some("12.3.1+build"));
    }

    #[test]
    fn parse_bad_escape_reports_component() {
        assert_eq!(
            parse("pkg:generic/na%2me"),
            Err(ErrorKind::InvalidEncoding {
                component: Component::Name,
                error: DecodeError::InvalidEscape {
                    offset: 2,
                    fragment: "%2m".to_string()
                },
            })
        );
    }

    #[test]
    fn parse_drops_subpath_dot_segments() {
        let parts = parse("pkg:generic/n#a/../b").unwrap();
        assert_eq!(parts.subpath.as_deref(), Some("a/b"));
    }

    #[test]
    fn parse_empty_subpath_is_absent() {
        assert_eq!(parse("pkg:generic/n#/").unwrap().subpath, None);
    }

    #[test]
    fn parse_question_mark_in_subpath_stays_in_subpath() {
        let parts = parse("pkg:generic/n#a?b").unwrap();
        assert!(parts.qualifiers.is_empty());
        assert_eq!(parts.subpath.as_deref(), Some("a?b"));
    }
}
