//! Generic validation and the shared finishing pipeline.
//!
//! Both entry points hand a [`Components`] record to [`finish`], which runs the
//! type policy and produces the immutable [`PackageUrl`].

use tracing::trace;

use crate::codec::{is_digit, is_type_char};
use crate::components::{Component, Components};
use crate::error::{ErrorKind, TypeError};
use crate::path::check_joined;
use crate::purl::PackageUrl;
use crate::registry::PolicyRegistry;

/// Checks a non-empty package type against `[A-Za-z0-9.+-]`, no leading digit.
pub(crate) fn validate_type(package_type: &str) -> Result<(), TypeError> {
    if let Some((position, char)) = package_type
        .chars()
        .enumerate()
        .find(|(_, c)| !is_type_char(*c))
    {
        return Err(TypeError::InvalidChar {
            package_type: package_type.to_string(),
            char,
            position,
        });
    }

    if package_type.starts_with(is_digit) {
        return Err(TypeError::LeadingDigit {
            package_type: package_type.to_string(),
        });
    }

    Ok(())
}

/// Runs the type policy over validated components and seals the result.
///
/// The caller has already folded and validated the type, checked the name is
/// non-empty, and built the qualifiers through [`Qualifiers`](crate::Qualifiers).
pub(crate) fn finish(
    components: Components,
    registry: &PolicyRegistry,
) -> Result<PackageUrl, ErrorKind> {
    let policy = registry.resolve(&components.package_type);
    trace!(
        package_type = %components.package_type,
        registered = policy.is_registered(),
        "applying type policy"
    );

    policy
        .validate(&components)
        .map_err(|error| ErrorKind::Policy {
            package_type: components.package_type.clone(),
            error,
        })?;

    let package_type = components.package_type.clone();
    let mut normalized = policy.normalize(components);
    // Policies may rewrite everything except the type they were resolved for.
    normalized.package_type = package_type;

    if normalized.name.is_empty() {
        return Err(ErrorKind::MissingComponent {
            component: Component::Name,
        });
    }
    if let Some(namespace) = &normalized.namespace {
        check_joined(namespace, Component::Namespace)?;
    }
    if let Some(subpath) = &normalized.subpath {
        check_joined(subpath, Component::Subpath)?;
    }

    Ok(PackageUrl::from_validated(normalized))
}
