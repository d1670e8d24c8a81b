//! Constants for package URL parsing and canonicalization.

/// The URI scheme.
pub const SCHEME: &str = "pkg";

/// The scheme followed by its delimiter, as it must appear at the start of a purl.
pub const SCHEME_PREFIX: &str = "pkg:";

/// Qualifier naming the Conan channel. Its presence must match the namespace.
pub const CHANNEL_QUALIFIER: &str = "channel";

/// Qualifier carrying the registry or repository a package was fetched from.
pub const REPOSITORY_URL_QUALIFIER: &str = "repository_url";

/// Qualifier carrying a SWID tag identifier. Required for `swid` purls.
pub const TAG_ID_QUALIFIER: &str = "tag_id";

/// Host suffix of the managed MLflow service whose model names are case-insensitive.
pub const DATABRICKS_HOST_SUFFIX: &str = "azuredatabricks.net";
