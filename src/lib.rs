//! Parser, validator and canonicalizer for package URLs (purls).
//!
//! A purl identifies a software package across ecosystems:
//!
//! ```text
//! pkg:<type>/<namespace>/<name>@<version>?<qualifiers>#<subpath>
//! ```
//!
//! Strings are parsed into a [`PackageUrl`], checked against generic rules and
//! a per-type policy, normalized, and rendered back in a single canonical form.
//!
//! # Quick Start
//!
//! ```rust
//! use pkg_url::PackageUrl;
//!
//! let purl = PackageUrl::parse(
//!     "pkg:deb/debian/curl@7.50.3-1?distro=jessie&arch=i386"
//! ).unwrap();
//!
//! assert_eq!(purl.package_type(), "deb");
//! assert_eq!(purl.namespace(), Some("debian"));
//! assert_eq!(purl.qualifiers().get("arch"), Some("i386"));
//!
//! // Canonical form sorts qualifiers
//! assert_eq!(
//!     purl.to_string(),
//!     "pkg:deb/debian/curl@7.50.3-1?arch=i386&distro=jessie"
//! );
//! ```
//!
//! # Construction
//!
//! Components can be supplied directly; the same validation applies:
//!
//! ```rust
//! use pkg_url::{PackageUrl, Qualifiers};
//!
//! let purl = PackageUrl::from_components(
//!     "pypi", None, "Django_Package", Some("1.11.1"), Qualifiers::new(), None,
//! ).unwrap();
//! assert_eq!(purl.to_string(), "pkg:pypi/django-package@1.11.1");
//! ```
//!
//! # Type Policies
//!
//! Known ecosystems carry built-in rules ([`BUILTIN_POLICIES`]). Additional
//! types are supported through [`TypePolicy`] implementations registered with
//! [`registry::register`] before the first parse, or with a local
//! [`PolicyRegistry`] passed to [`PackageUrl::parse_with`].
//!
//! # Features
//!
//! - `serde`: serialize [`PackageUrl`] as its canonical string and
//!   [`Qualifiers`] as a map.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod canonical;
pub mod codec;
mod components;
mod constants;
mod error;
mod parser;
mod path;
mod policy;
pub mod prelude;
mod purl;
mod qualifiers;
pub mod registry;
mod validate;

pub use components::{Component, Components};
pub use constants::{
    CHANNEL_QUALIFIER, DATABRICKS_HOST_SUFFIX, REPOSITORY_URL_QUALIFIER, SCHEME, SCHEME_PREFIX,
    TAG_ID_QUALIFIER,
};
pub use error::{
    ConstructError, DecodeError, ErrorClass, ErrorKind, ParseError, PolicyError, QualifierError,
    RegistryError, SegmentError, TypeError,
};
pub use policy::{
    BUILTIN_POLICIES, BuiltinPolicy, NameRule, Presence, TypePolicy, builtin, is_known_type,
};
pub use purl::PackageUrl;
pub use qualifiers::Qualifiers;
pub use registry::{PolicyRegistry, ResolvedPolicy};
