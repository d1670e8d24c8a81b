//! Error types for package URL parsing and construction.

use std::fmt;

use crate::components::Component;

/// The two broad failure classes every error falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The input violates the generic grammar or a per-type structural rule.
    MalformedInput,
    /// A caller handed the component constructor an empty required value.
    InvalidArgument,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput => write!(f, "malformed input"),
            Self::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}

/// Errors that can occur when parsing a purl string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The input that failed to parse
    pub input: String,
    /// The specific error that occurred
    pub kind: ErrorKind,
}

impl ParseError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse purl '{}': {}", self.input, self.kind)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

/// Errors that can occur when building a purl from its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructError {
    /// The specific error that occurred
    pub kind: ErrorKind,
}

impl ConstructError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl From<ErrorKind> for ConstructError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to construct purl: {}", self.kind)
    }
}

impl std::error::Error for ConstructError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

/// Specific failure shared by both entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input string is empty
    Empty,
    /// Missing or invalid scheme (expected "pkg:")
    InvalidScheme {
        /// The scheme that was found, if any
        found: Option<String>,
    },
    /// The purl carries user info or a port after `pkg://`
    UnexpectedAuthority {
        /// The authority that was found
        authority: String,
    },
    /// A required component is absent from the parsed string
    MissingComponent {
        /// The missing component
        component: Component,
    },
    /// A required component was passed to the constructor empty
    EmptyArgument {
        /// The empty component
        component: Component,
    },
    /// Package type validation failed
    InvalidType(TypeError),
    /// Qualifier validation failed
    InvalidQualifier(QualifierError),
    /// A namespace or subpath segment is invalid
    InvalidSegment {
        /// Component the segment belongs to
        component: Component,
        /// Reason for invalidity
        error: SegmentError,
    },
    /// Percent-decoding failed
    InvalidEncoding {
        /// Component being decoded
        component: Component,
        /// Reason for invalidity
        error: DecodeError,
    },
    /// A type policy rejected the components
    Policy {
        /// The package type whose policy failed
        package_type: String,
        /// Reason given by the policy
        error: PolicyError,
    },
}

impl ErrorKind {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyArgument { .. }
            | Self::InvalidQualifier(QualifierError::EmptyValue { .. }) => {
                ErrorClass::InvalidArgument
            }
            _ => ErrorClass::MalformedInput,
        }
    }

    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidType(e) => Some(e),
            Self::InvalidQualifier(e) => Some(e),
            Self::InvalidSegment { error, .. } => Some(error),
            Self::InvalidEncoding { error, .. } => Some(error),
            Self::Policy { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "input is empty"),
            Self::InvalidScheme { found } => match found {
                Some(s) => write!(f, "expected scheme 'pkg:', found '{s}:'"),
                None => write!(f, "missing scheme; purl must start with 'pkg:'"),
            },
            Self::UnexpectedAuthority { authority } => write!(
                f,
                "purls never carry an authority, found '{authority}'; remove user info and port"
            ),
            Self::MissingComponent { component } => {
                write!(f, "missing required component: {component}")
            }
            Self::EmptyArgument { component } => {
                write!(f, "{component} is required and cannot be empty")
            }
            Self::InvalidType(e) => write!(f, "invalid package type: {e}"),
            Self::InvalidQualifier(e) => write!(f, "invalid qualifier: {e}"),
            Self::InvalidSegment { component, error } => {
                write!(f, "invalid {component} segment: {error}")
            }
            Self::InvalidEncoding { component, error } => {
                write!(f, "invalid percent-encoding in {component}: {error}")
            }
            Self::Policy {
                package_type,
                error,
            } => write!(f, "{package_type} purl rejected: {error}"),
        }
    }
}

impl From<TypeError> for ErrorKind {
    fn from(e: TypeError) -> Self {
        Self::InvalidType(e)
    }
}

impl From<QualifierError> for ErrorKind {
    fn from(e: QualifierError) -> Self {
        Self::InvalidQualifier(e)
    }
}

/// Errors for percent-decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` is not followed by two hex digits
    InvalidEscape {
        /// Byte offset of the `%` in the input
        offset: usize,
        /// The escape as it appeared, truncated to three bytes
        fragment: String,
    },
    /// The decoded bytes are not UTF-8
    InvalidUtf8 {
        /// The encoded input
        input: String,
        /// Length of the valid decoded prefix
        valid_up_to: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEscape { offset, fragment } => write!(
                f,
                "malformed escape '{fragment}' at byte offset {offset}; '%' must be followed by two hex digits"
            ),
            Self::InvalidUtf8 { input, valid_up_to } => write!(
                f,
                "'{input}' does not decode to UTF-8 (valid up to decoded byte {valid_up_to})"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors for package type validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Character outside `[A-Za-z0-9.+-]`
    InvalidChar {
        /// The invalid type
        package_type: String,
        /// The invalid character
        char: char,
        /// Position in the type
        position: usize,
    },
    /// Type starts with a digit
    LeadingDigit {
        /// The invalid type
        package_type: String,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar {
                package_type,
                char,
                position,
            } => write!(
                f,
                "'{package_type}' has invalid character '{char}' at position {position}; only letters, digits, '.', '+' and '-' allowed"
            ),
            Self::LeadingDigit { package_type } => {
                write!(f, "'{package_type}' must not start with a digit")
            }
        }
    }
}

impl std::error::Error for TypeError {}

/// Errors for qualifier validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualifierError {
    /// Key is empty
    EmptyKey,
    /// Character outside `[A-Za-z0-9._-]`
    InvalidKeyChar {
        /// The invalid key
        key: String,
        /// The invalid character
        char: char,
        /// Position in the key
        position: usize,
    },
    /// Key starts with a digit
    LeadingDigit {
        /// The invalid key
        key: String,
    },
    /// Two keys fold to the same lower-case key
    DuplicateKey {
        /// The folded key
        key: String,
    },
    /// Value is empty
    EmptyValue {
        /// The key whose value is empty
        key: String,
    },
}

impl fmt::Display for QualifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "qualifier key cannot be empty"),
            Self::InvalidKeyChar {
                key,
                char,
                position,
            } => write!(
                f,
                "key '{key}' has invalid character '{char}' at position {position}; only letters, digits, '.', '_' and '-' allowed"
            ),
            Self::LeadingDigit { key } => write!(f, "key '{key}' must not start with a digit"),
            Self::DuplicateKey { key } => write!(f, "duplicate qualifier '{key}'"),
            Self::EmptyValue { key } => write!(f, "qualifier '{key}' has an empty value"),
        }
    }
}

impl std::error::Error for QualifierError {}

/// Errors for namespace and subpath segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    /// Segment is empty
    Empty,
    /// Decoded segment contains a '/'
    ContainsSlash {
        /// The decoded segment
        segment: String,
    },
    /// Segment is `.` or `..`
    DotSegment {
        /// The segment
        segment: String,
    },
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "segment cannot be empty"),
            Self::ContainsSlash { segment } => {
                write!(f, "segment '{segment}' contains '/'")
            }
            Self::DotSegment { segment } => {
                write!(f, "segment '{segment}' is not allowed")
            }
        }
    }
}

impl std::error::Error for SegmentError {}

/// Errors raised by a type policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The type requires a component that is absent
    Required {
        /// The missing component
        component: Component,
    },
    /// The type forbids a component that is present
    Forbidden {
        /// The forbidden component
        component: Component,
    },
    /// The type requires a qualifier that is absent
    RequiredQualifier {
        /// The missing qualifier key
        key: String,
    },
    /// The name breaks a type-specific rule
    InvalidName {
        /// The offending name
        name: String,
        /// Reason for invalidity
        reason: &'static str,
    },
    /// Free-form rejection from an externally registered policy
    Invalid {
        /// Reason for invalidity
        reason: String,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { component } => write!(f, "{component} is required"),
            Self::Forbidden { component } => write!(f, "{component} is not allowed"),
            Self::RequiredQualifier { key } => write!(f, "qualifier '{key}' is required"),
            Self::InvalidName { name, reason } => write!(f, "invalid name '{name}': {reason}"),
            Self::Invalid { reason } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for PolicyError {}

/// Errors for type policy registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry already resolved a policy and no longer accepts registrations
    Sealed {
        /// The type that could not be registered
        package_type: String,
    },
    /// A policy is already registered for this type
    AlreadyRegistered {
        /// The duplicated type
        package_type: String,
    },
    /// The type name is empty
    EmptyType,
    /// The type name is invalid
    InvalidType(TypeError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sealed { package_type } => write!(
                f,
                "cannot register '{package_type}': the registry is sealed once a purl has been validated; register policies at startup"
            ),
            Self::AlreadyRegistered { package_type } => {
                write!(f, "a policy for '{package_type}' is already registered")
            }
            Self::EmptyType => write!(f, "package type cannot be empty"),
            Self::InvalidType(e) => write!(f, "invalid package type: {e}"),
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argument_is_invalid_argument() {
        let kind = ErrorKind::EmptyArgument {
            component: Component::Name,
        };
        assert_eq!(kind.class(), ErrorClass::InvalidArgument);
    }

    #[test]
    fn empty_qualifier_value_is_invalid_argument() {
        let kind = ErrorKind::InvalidQualifier(QualifierError::EmptyValue {
            key: "arch".to_string(),
        });
        assert_eq!(kind.class(), ErrorClass::InvalidArgument);
    }

    #[test]
    fn duplicate_key_is_malformed_input() {
        let kind = ErrorKind::InvalidQualifier(QualifierError::DuplicateKey {
            key: "key".to_string(),
        });
        assert_eq!(kind.class(), ErrorClass::MalformedInput);
        assert!(kind.to_string().contains("'key'"));
    }

    #[test]
    fn parse_error_display_includes_input() {
        let err = ParseError {
            input: "npm/foo".to_string(),
            kind: ErrorKind::InvalidScheme { found: None },
        };
        assert_eq!(
            err.to_string(),
            "failed to parse purl 'npm/foo': missing scheme; purl must start with 'pkg:'"
        );
    }

    #[test]
    fn policy_error_display() {
        let kind = ErrorKind::Policy {
            package_type: "maven".to_string(),
            error: PolicyError::Required {
                component: Component::Namespace,
            },
        };
        assert_eq!(kind.to_string(), "maven purl rejected: namespace is required");
    }
}
