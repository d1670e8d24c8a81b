//! The staging record that both entry points fill before validation.

use std::fmt;

use crate::qualifiers::Qualifiers;

/// A specific, fixed component of a purl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    /// The package type, e.g. `maven` in `pkg:maven/org.a/b`.
    Type,
    /// The namespace, e.g. `org.a` in `pkg:maven/org.a/b`.
    Namespace,
    /// The name, e.g. `b` in `pkg:maven/org.a/b`.
    Name,
    /// The version, e.g. `1.0` in `pkg:npm/b@1.0`.
    Version,
    /// The qualifiers, e.g. `arch=x86` in `pkg:deb/b?arch=x86`.
    Qualifiers,
    /// The subpath, e.g. `lib` in `pkg:golang/b#lib`.
    Subpath,
}

impl Component {
    /// Returns a `&'static str` naming the component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Namespace => "namespace",
            Self::Name => "name",
            Self::Version => "version",
            Self::Qualifiers => "qualifiers",
            Self::Subpath => "subpath",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded, not yet normalized purl components.
///
/// This is what a [`TypePolicy`](crate::TypePolicy) sees and rewrites. The
/// `package_type` is already lower-cased and validated when a policy runs;
/// namespace and subpath hold `/`-joined segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Components {
    /// Lower-case package type
    pub package_type: String,
    /// Optional `/`-joined namespace
    pub namespace: Option<String>,
    /// Package name
    pub name: String,
    /// Optional version
    pub version: Option<String>,
    /// Qualifiers, sorted by key
    pub qualifiers: Qualifiers,
    /// Optional `/`-joined subpath
    pub subpath: Option<String>,
}

impl Components {
    /// Returns the namespace segments, or an empty iterator without a namespace.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.as_deref().into_iter().flat_map(|ns| ns.split('/'))
    }

    /// Returns true if the given component is present.
    ///
    /// The type and name always count as present, even if empty.
    #[must_use]
    pub fn has(&self, component: Component) -> bool {
        match component {
            Component::Type | Component::Name => true,
            Component::Namespace => self.namespace.is_some(),
            Component::Version => self.version.is_some(),
            Component::Qualifiers => !self.qualifiers.is_empty(),
            Component::Subpath => self.subpath.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_segments_split_on_slash() {
        let parts = Components {
            namespace: Some("github.com/package-url".to_string()),
            ..Components::default()
        };
        let segments: Vec<_> = parts.namespace_segments().collect();
        assert_eq!(segments, vec!["github.com", "package-url"]);
    }

    #[test]
    fn namespace_segments_empty_without_namespace() {
        assert_eq!(Components::default().namespace_segments().count(), 0);
    }

    #[test]
    fn has_reports_optional_components() {
        let parts = Components {
            version: Some("1.0".to_string()),
            ..Components::default()
        };
        assert!(parts.has(Component::Version));
        assert!(!parts.has(Component::Namespace));
        assert!(!parts.has(Component::Qualifiers));
    }
}
