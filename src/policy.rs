//! Per-type validation and normalization rules.
//!
//! Every ecosystem rule is expressed as data in [`BUILTIN_POLICIES`]. A type
//! without an entry passes through unchanged.

use std::fmt;

use crate::codec::to_lower_ascii;
use crate::components::{Component, Components};
use crate::constants::{
    CHANNEL_QUALIFIER, DATABRICKS_HOST_SUFFIX, REPOSITORY_URL_QUALIFIER, TAG_ID_QUALIFIER,
};
use crate::error::PolicyError;

/// Ecosystem-specific rules applied after generic validation.
///
/// Both methods default to pass-through, so an implementation only overrides
/// what its ecosystem needs. `validate` runs first and sees the decoded
/// components; `normalize` runs only if validation succeeded.
///
/// # Examples
///
/// ```
/// use pkg_url::{Components, PolicyError, PolicyRegistry, TypePolicy, PackageUrl};
///
/// struct Internal;
///
/// impl TypePolicy for Internal {
///     fn validate(&self, components: &Components) -> Result<(), PolicyError> {
///         if components.version.is_none() {
///             return Err(PolicyError::Invalid { reason: "builds are always pinned".into() });
///         }
///         Ok(())
///     }
///
///     fn normalize(&self, mut components: Components) -> Components {
///         components.name = components.name.to_ascii_uppercase();
///         components
///     }
/// }
///
/// let registry = PolicyRegistry::new();
/// registry.register("internal", Internal).unwrap();
///
/// let purl = PackageUrl::parse_with("pkg:internal/tool@1.0", &registry).unwrap();
/// assert_eq!(purl.name(), "TOOL");
/// assert!(PackageUrl::parse_with("pkg:internal/tool", &registry).is_err());
/// ```
pub trait TypePolicy: Send + Sync {
    /// Checks type-specific structural rules.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError` describing the violated rule.
    fn validate(&self, components: &Components) -> Result<(), PolicyError> {
        let _ = components;
        Ok(())
    }

    /// Applies type-specific casing and character transforms.
    fn normalize(&self, components: Components) -> Components {
        components
    }
}

/// Whether a type needs, allows, or refuses an optional component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// May be present or absent
    Optional,
    /// Must be present
    Required,
    /// Must be absent
    Forbidden,
}

/// How a type rewrites the package name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Left as is
    Keep,
    /// ASCII lower-cased
    Lowercase,
    /// Lower-cased, `_` replaced with `-`
    Pypi,
    /// Lower-cased, anything outside `[a-z0-9_]` replaced with `_`
    Pub,
    /// Lower-cased only when `repository_url` points at Azure Databricks
    Databricks,
}

type Check = fn(&Components) -> Result<(), PolicyError>;

/// A table-driven policy for a well-known package type.
#[derive(Clone, Copy)]
pub struct BuiltinPolicy {
    package_type: &'static str,
    namespace: Presence,
    version: Presence,
    lowercase_namespace: bool,
    name: NameRule,
    lowercase_version: bool,
    required_qualifiers: &'static [&'static str],
    check: Option<Check>,
}

impl BuiltinPolicy {
    const fn new(package_type: &'static str) -> Self {
        Self {
            package_type,
            namespace: Presence::Optional,
            version: Presence::Optional,
            lowercase_namespace: false,
            name: NameRule::Keep,
            lowercase_version: false,
            required_qualifiers: &[],
            check: None,
        }
    }

    const fn namespace(mut self, presence: Presence) -> Self {
        self.namespace = presence;
        self
    }

    const fn version(mut self, presence: Presence) -> Self {
        self.version = presence;
        self
    }

    const fn lowercase_namespace(mut self) -> Self {
        self.lowercase_namespace = true;
        self
    }

    const fn name(mut self, rule: NameRule) -> Self {
        self.name = rule;
        self
    }

    const fn lowercase_version(mut self) -> Self {
        self.lowercase_version = true;
        self
    }

    const fn require_qualifiers(mut self, keys: &'static [&'static str]) -> Self {
        self.required_qualifiers = keys;
        self
    }

    const fn check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }

    /// Returns the type this policy applies to.
    #[must_use]
    pub const fn package_type(&self) -> &'static str {
        self.package_type
    }

    /// Returns the namespace requirement.
    #[must_use]
    pub const fn namespace_presence(&self) -> Presence {
        self.namespace
    }

    /// Returns the version requirement.
    #[must_use]
    pub const fn version_presence(&self) -> Presence {
        self.version
    }

    /// Returns the name rewrite rule.
    #[must_use]
    pub const fn name_rule(&self) -> NameRule {
        self.name
    }
}

impl fmt::Debug for BuiltinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinPolicy")
            .field("package_type", &self.package_type)
            .field("namespace", &self.namespace)
            .field("version", &self.version)
            .field("lowercase_namespace", &self.lowercase_namespace)
            .field("name", &self.name)
            .field("lowercase_version", &self.lowercase_version)
            .field("required_qualifiers", &self.required_qualifiers)
            .field("check", &self.check.is_some())
            .finish()
    }
}

impl TypePolicy for BuiltinPolicy {
    fn validate(&self, components: &Components) -> Result<(), PolicyError> {
        check_presence(components, Component::Namespace, self.namespace)?;
        check_presence(components, Component::Version, self.version)?;

        if let Some(key) = self
            .required_qualifiers
            .iter()
            .find(|key| !components.qualifiers.contains_key(key))
        {
            return Err(PolicyError::RequiredQualifier {
                key: (*key).to_string(),
            });
        }

        match self.check {
            Some(check) => check(components),
            None => Ok(()),
        }
    }

    fn normalize(&self, mut components: Components) -> Components {
        if self.lowercase_namespace {
            components.namespace = components.namespace.map(lowercase);
        }

        components.name = match self.name {
            NameRule::Keep => components.name,
            NameRule::Lowercase => lowercase(components.name),
            NameRule::Pypi => to_lower_ascii(&components.name).replace('_', "-"),
            NameRule::Pub => to_lower_ascii(&components.name)
                .chars()
                .map(|c| {
                    if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect(),
            NameRule::Databricks if is_databricks(&components) => lowercase(components.name),
            NameRule::Databricks => components.name,
        };

        if self.lowercase_version {
            components.version = components.version.map(lowercase);
        }

        components
    }
}

/// Policy applied to types without a table entry.
pub(crate) static PASS_THROUGH: BuiltinPolicy = BuiltinPolicy::new("");

/// Built-in policies, sorted by type name.
pub static BUILTIN_POLICIES: &[BuiltinPolicy] = &[
    BuiltinPolicy::new("alpm")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("apk")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("bitbucket")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("bitnami").lowercase_namespace(),
    BuiltinPolicy::new("cargo"),
    BuiltinPolicy::new("cocoapods")
        .namespace(Presence::Forbidden)
        .check(check_cocoapods_name),
    BuiltinPolicy::new("composer")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("conan").check(check_conan_channel),
    BuiltinPolicy::new("conda"),
    BuiltinPolicy::new("cpan").check(check_cpan_name),
    BuiltinPolicy::new("cran").version(Presence::Required),
    BuiltinPolicy::new("deb")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("docker"),
    BuiltinPolicy::new("gem"),
    BuiltinPolicy::new("generic"),
    BuiltinPolicy::new("github")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("golang").lowercase_namespace(),
    BuiltinPolicy::new("hackage").version(Presence::Required),
    BuiltinPolicy::new("hex")
        .lowercase_namespace()
        .name(NameRule::Lowercase),
    BuiltinPolicy::new("huggingface").lowercase_version(),
    BuiltinPolicy::new("luarocks").lowercase_version(),
    BuiltinPolicy::new("maven").namespace(Presence::Required),
    BuiltinPolicy::new("mlflow")
        .namespace(Presence::Forbidden)
        .name(NameRule::Databricks),
    BuiltinPolicy::new("npm"),
    BuiltinPolicy::new("nuget"),
    BuiltinPolicy::new("oci")
        .namespace(Presence::Forbidden)
        .lowercase_version(),
    BuiltinPolicy::new("pub").name(NameRule::Pub),
    BuiltinPolicy::new("pypi").name(NameRule::Pypi),
    BuiltinPolicy::new("qpkg").lowercase_namespace(),
    BuiltinPolicy::new("rpm").lowercase_namespace(),
    BuiltinPolicy::new("swid").require_qualifiers(&[TAG_ID_QUALIFIER]),
    BuiltinPolicy::new("swift")
        .namespace(Presence::Required)
        .version(Presence::Required),
];

/// Looks up the built-in policy for a lower-case type.
#[must_use]
pub fn builtin(package_type: &str) -> Option<&'static BuiltinPolicy> {
    BUILTIN_POLICIES
        .binary_search_by(|p| p.package_type.cmp(package_type))
        .ok()
        .map(|i| &BUILTIN_POLICIES[i])
}

/// Returns true if the type has a built-in policy. The lookup folds ASCII case.
///
/// # Examples
///
/// ```
/// assert!(pkg_url::is_known_type("Maven"));
/// assert!(!pkg_url::is_known_type("made-up"));
/// ```
#[must_use]
pub fn is_known_type(package_type: &str) -> bool {
    builtin(&to_lower_ascii(package_type)).is_some()
}

fn check_presence(
    components: &Components,
    component: Component,
    presence: Presence,
) -> Result<(), PolicyError> {
    match (presence, components.has(component)) {
        (Presence::Required, false) => Err(PolicyError::Required { component }),
        (Presence::Forbidden, true) => Err(PolicyError::Forbidden { component }),
        _ => Ok(()),
    }
}

fn check_cocoapods_name(components: &Components) -> Result<(), PolicyError> {
    let name = &components.name;
    let reason = if name.chars().any(char::is_whitespace) {
        "cannot contain whitespace"
    } else if name.starts_with('.') {
        "cannot start with a period"
    } else if name.contains('+') {
        "cannot contain a plus sign"
    } else {
        return Ok(());
    };
    Err(PolicyError::InvalidName {
        name: name.clone(),
        reason,
    })
}

fn check_conan_channel(components: &Components) -> Result<(), PolicyError> {
    let has_channel = components.qualifiers.contains_key(CHANNEL_QUALIFIER);
    match (components.namespace.is_some(), has_channel) {
        (true, false) => Err(PolicyError::RequiredQualifier {
            key: CHANNEL_QUALIFIER.to_string(),
        }),
        (false, true) => Err(PolicyError::Required {
            component: Component::Namespace,
        }),
        _ => Ok(()),
    }
}

fn check_cpan_name(components: &Components) -> Result<(), PolicyError> {
    let name = &components.name;
    match &components.namespace {
        None if name.contains('-') => Err(PolicyError::InvalidName {
            name: name.clone(),
            reason: "a distribution name needs an author namespace; module names use '::'",
        }),
        Some(_) if name.contains("::") => Err(PolicyError::InvalidName {
            name: name.clone(),
            reason: "a module name cannot have a namespace; distribution names use '-'",
        }),
        _ => Ok(()),
    }
}

fn is_databricks(components: &Components) -> bool {
    components
        .qualifiers
        .get(REPOSITORY_URL_QUALIFIER)
        .and_then(|repo| url::Url::parse(repo).ok())
        .and_then(|repo| repo.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host.ends_with(DATABRICKS_HOST_SUFFIX))
}

fn lowercase(value: String) -> String {
    match to_lower_ascii(&value) {
        std::borrow::Cow::Borrowed(_) => value,
        std::borrow::Cow::Owned(folded) => folded,
    }
}
