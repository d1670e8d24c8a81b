//! Main package URL type.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::canonical::{Form, render, write_canonical};
use crate::codec::to_lower_ascii;
use crate::components::{Component, Components};
use crate::error::{ConstructError, ErrorKind, ParseError};
use crate::parser;
use crate::path::{namespace_from_arg, subpath_from_arg};
use crate::qualifiers::Qualifiers;
use crate::registry::{self, PolicyRegistry};
use crate::validate::{finish, validate_type};

/// A parsed, validated and normalized package URL.
///
/// Instances are immutable. Both [`PackageUrl::parse`] and
/// [`PackageUrl::from_components`] run the same validation and type policy
/// pipeline, and `Display` always yields the canonical form.
///
/// # Structure
///
/// ```text
/// pkg:<type>/<namespace>/<name>@<version>?<qualifiers>#<subpath>
/// ```
///
/// # Examples
///
/// ```
/// use pkg_url::PackageUrl;
///
/// let purl = PackageUrl::parse("pkg:maven/org.apache.commons/io@1.3.4").unwrap();
/// assert_eq!(purl.package_type(), "maven");
/// assert_eq!(purl.namespace(), Some("org.apache.commons"));
/// assert_eq!(purl.name(), "io");
/// assert_eq!(purl.version(), Some("1.3.4"));
/// assert_eq!(purl.to_string(), "pkg:maven/org.apache.commons/io@1.3.4");
///
/// // Qualifiers are sorted and type rules applied
/// let purl = PackageUrl::parse("pkg:PyPI/Django_package@1.0?os=linux&arch=x86").unwrap();
/// assert_eq!(purl.to_string(), "pkg:pypi/django-package@1.0?arch=x86&os=linux");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageUrl {
    package_type: String,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
    qualifiers: Qualifiers,
    subpath: Option<String>,
}

impl PackageUrl {
    /// Parses a purl string using the process-wide policy registry.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty or does not start with `pkg:`
    /// - The purl carries an authority (user info or port)
    /// - The type or name is missing
    /// - The type or a qualifier key has invalid characters or a leading digit
    /// - Two qualifier keys collide after case folding
    /// - A percent-escape is malformed
    /// - The type policy rejects the components
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(input, registry::global())
    }

    /// Parses a purl string using the given policy registry.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` under the same conditions as [`PackageUrl::parse`].
    pub fn parse_with(input: &str, registry: &PolicyRegistry) -> Result<Self, ParseError> {
        parser::parse(input)
            .and_then(|components| finish(components, registry))
            .map_err(|kind| ParseError {
                input: input.to_string(),
                kind,
            })
    }

    /// Builds a purl from decoded components using the process-wide policy registry.
    ///
    /// This is stricter than parsing: subpath `.`/`..` segments and empty
    /// qualifier values are errors instead of being dropped. Empty optional
    /// strings count as absent. Pass `Qualifiers::new()` for no qualifiers.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if the type or name is empty, any component is
    /// invalid, or the type policy rejects the components.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkg_url::{ErrorClass, PackageUrl, Qualifiers};
    ///
    /// let purl = PackageUrl::from_components(
    ///     "maven",
    ///     Some("org.apache.commons"),
    ///     "io",
    ///     Some("1.3.4"),
    ///     [("classifier", "sources")],
    ///     None,
    /// )
    /// .unwrap();
    /// assert_eq!(purl.to_string(), "pkg:maven/org.apache.commons/io@1.3.4?classifier=sources");
    ///
    /// let err = PackageUrl::from_components("maven", None, "", None, Qualifiers::new(), None)
    ///     .unwrap_err();
    /// assert_eq!(err.class(), ErrorClass::InvalidArgument);
    /// ```
    pub fn from_components<I, K, V>(
        package_type: &str,
        namespace: Option<&str>,
        name: &str,
        version: Option<&str>,
        qualifiers: I,
        subpath: Option<&str>,
    ) -> Result<Self, ConstructError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::from_components_with(
            package_type,
            namespace,
            name,
            version,
            qualifiers,
            subpath,
            registry::global(),
        )
    }

    /// Builds a purl from decoded components using the given policy registry.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` under the same conditions as
    /// [`PackageUrl::from_components`].
    pub fn from_components_with<I, K, V>(
        package_type: &str,
        namespace: Option<&str>,
        name: &str,
        version: Option<&str>,
        qualifiers: I,
        subpath: Option<&str>,
        registry: &PolicyRegistry,
    ) -> Result<Self, ConstructError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if package_type.is_empty() {
            return Err(ErrorKind::EmptyArgument {
                component: Component::Type,
            }
            .into());
        }
        validate_type(package_type).map_err(ErrorKind::from)?;

        if name.is_empty() {
            return Err(ErrorKind::EmptyArgument {
                component: Component::Name,
            }
            .into());
        }

        let components = Components {
            package_type: to_lower_ascii(package_type).into_owned(),
            namespace: namespace.and_then(namespace_from_arg),
            name: name.to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
            qualifiers: Qualifiers::try_from_pairs(qualifiers).map_err(ErrorKind::from)?,
            subpath: subpath.map(subpath_from_arg).transpose()?.flatten(),
        };

        Ok(finish(components, registry)?)
    }

    /// Wraps components that already went through [`finish`].
    pub(crate) fn from_validated(components: Components) -> Self {
        Self {
            package_type: components.package_type,
            namespace: components.namespace,
            name: components.name,
            version: components.version,
            qualifiers: components.qualifiers,
            subpath: components.subpath,
        }
    }

    /// Returns the lower-case package type.
    #[must_use]
    pub fn package_type(&self) -> &str {
        &self.package_type
    }

    /// Returns the decoded namespace, if present.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the decoded namespace segments.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.as_deref().into_iter().flat_map(|ns| ns.split('/'))
    }

    /// Returns the decoded name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded version, if present.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the qualifiers.
    #[must_use]
    pub const fn qualifiers(&self) -> &Qualifiers {
        &self.qualifiers
    }

    /// Returns the decoded subpath, if present.
    #[must_use]
    pub fn subpath(&self) -> Option<&str> {
        self.subpath.as_deref()
    }

    /// Returns the decoded subpath segments.
    pub fn subpath_segments(&self) -> impl Iterator<Item = &str> {
        self.subpath.as_deref().into_iter().flat_map(|sp| sp.split('/'))
    }

    /// Returns the canonical string without qualifiers and subpath.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkg_url::PackageUrl;
    ///
    /// let purl = PackageUrl::parse("pkg:npm/foo@1.0?arch=x86#dist").unwrap();
    /// assert_eq!(purl.to_coordinates(), "pkg:npm/foo@1.0");
    /// ```
    #[must_use]
    pub fn to_coordinates(&self) -> String {
        render(self, Form::Coordinates)
    }

    /// Returns true if both purls name the same type, namespace, name and version.
    #[must_use]
    pub fn coordinates_eq(&self, other: &Self) -> bool {
        self.package_type == other.package_type
            && self.namespace == other.namespace
            && self.name == other.name
            && self.version == other.version
    }

    /// Returns true if both purls have the same canonical string.
    #[must_use]
    pub fn canonical_eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }

    /// Returns a copy with the given version, revalidated against the type policy.
    ///
    /// Like the other `with_*` and `without_*` methods, this resolves the
    /// policy through the process-wide registry. An empty version counts as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if the type policy rejects the result.
    pub fn with_version(&self, version: &str) -> Result<Self, ConstructError> {
        let mut components = self.to_components();
        components.version = (!version.is_empty()).then(|| version.to_string());
        Self::refinish(components)
    }

    /// Returns a copy without a version, revalidated against the type policy.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if the type requires a version.
    pub fn without_version(&self) -> Result<Self, ConstructError> {
        let mut components = self.to_components();
        components.version = None;
        Self::refinish(components)
    }

    /// Returns a copy with the given qualifiers replacing the current ones.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if a qualifier is invalid or the type policy
    /// rejects the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkg_url::PackageUrl;
    ///
    /// let purl = PackageUrl::parse("pkg:deb/debian/curl@7.50.3-1").unwrap();
    /// let updated = purl.with_qualifiers([("arch", "i386")]).unwrap();
    /// assert_eq!(updated.to_string(), "pkg:deb/debian/curl@7.50.3-1?arch=i386");
    /// ```
    pub fn with_qualifiers<I, K, V>(&self, qualifiers: I) -> Result<Self, ConstructError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut components = self.to_components();
        components.qualifiers = Qualifiers::try_from_pairs(qualifiers).map_err(ErrorKind::from)?;
        Self::refinish(components)
    }

    /// Returns a copy without qualifiers.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if the type policy requires a qualifier.
    pub fn without_qualifiers(&self) -> Result<Self, ConstructError> {
        let mut components = self.to_components();
        components.qualifiers = Qualifiers::new();
        Self::refinish(components)
    }

    /// Returns a copy with the given subpath.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if the subpath has `.` or `..` segments.
    pub fn with_subpath(&self, subpath: &str) -> Result<Self, ConstructError> {
        let mut components = self.to_components();
        components.subpath = subpath_from_arg(subpath)?;
        Self::refinish(components)
    }

    /// Returns a copy without a subpath.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError` if the type policy rejects the result.
    pub fn without_subpath(&self) -> Result<Self, ConstructError> {
        let mut components = self.to_components();
        components.subpath = None;
        Self::refinish(components)
    }

    fn to_components(&self) -> Components {
        Components {
            package_type: self.package_type.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            qualifiers: self.qualifiers.clone(),
            subpath: self.subpath.clone(),
        }
    }

    fn refinish(components: Components) -> Result<Self, ConstructError> {
        Ok(finish(components, registry::global())?)
    }
}

impl fmt::Display for PackageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_canonical(f, self, Form::Full)
    }
}

impl FromStr for PackageUrl {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PackageUrl {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl PartialOrd for PackageUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PackageUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PackageUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
