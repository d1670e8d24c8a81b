//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use pkg_url::prelude::*;
//!
//! let purl = PackageUrl::parse("pkg:cargo/serde@1.0.0").unwrap();
//! assert_eq!(purl.name(), "serde");
//! ```
//!
//! Codec helpers and the built-in policy table are left out; import them from
//! the crate root when needed.

pub use crate::{
    // Core types
    Component, Components, PackageUrl, Qualifiers,
    // Policies
    PolicyRegistry, TypePolicy,
    // Errors
    ConstructError, ErrorClass, ErrorKind, ParseError, PolicyError, RegistryError,
};
