//! Qualifier map for package URLs.

use std::collections::BTreeMap;
use std::fmt;

use crate::codec::{is_digit, is_key_char, percent_decode, percent_encode, to_lower_ascii};
use crate::components::Component;
use crate::error::{ErrorKind, QualifierError};

/// Qualifiers from a purl.
///
/// Keys are stored lower-case and iterate in ascending order, which is the
/// order the canonical form uses. Values are never empty.
///
/// # Examples
///
/// ```
/// use pkg_url::Qualifiers;
///
/// let q = Qualifiers::try_from_pairs([("OS", "linux"), ("arch", "x86_64")]).unwrap();
/// assert_eq!(q.get("os"), Some("linux"));
/// assert_eq!(q.to_string(), "arch=x86_64&os=linux");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Qualifiers {
    entries: BTreeMap<String, String>,
}

impl Qualifiers {
    /// Creates an empty qualifier map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds qualifiers from key/value pairs, rejecting anything invalid.
    ///
    /// Keys are folded to lower case before the duplicate check, so `KEY` and
    /// `key` collide.
    ///
    /// # Errors
    ///
    /// Returns `QualifierError` if a key is invalid, two keys collide, or a
    /// value is empty.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, QualifierError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut qualifiers = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            if qualifiers.insert(key, value)?.is_some() {
                return Err(QualifierError::DuplicateKey {
                    key: to_lower_ascii(key).into_owned(),
                });
            }
        }
        Ok(qualifiers)
    }

    /// Parses a raw qualifier string (without the leading `?`).
    ///
    /// Pieces without `=` and pairs whose decoded value is empty are dropped.
    pub(crate) fn parse(input: &str) -> Result<Self, ErrorKind> {
        let mut qualifiers = Self::new();

        for pair in input.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };

            let value = percent_decode(value).map_err(|error| ErrorKind::InvalidEncoding {
                component: Component::Qualifiers,
                error,
            })?;
            if value.is_empty() {
                continue;
            }

            if qualifiers.insert(key, value)?.is_some() {
                return Err(QualifierError::DuplicateKey {
                    key: to_lower_ascii(key).into_owned(),
                }
                .into());
            }
        }

        Ok(qualifiers)
    }

    /// Inserts a qualifier, folding the key to lower case.
    ///
    /// Returns the previous value stored under the folded key.
    ///
    /// # Errors
    ///
    /// Returns `QualifierError` if the key is invalid or the value is empty.
    pub fn insert(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, QualifierError> {
        let key = validate_key(key)?;
        let value = value.into();
        if value.is_empty() {
            return Err(QualifierError::EmptyValue { key });
        }
        Ok(self.entries.insert(key, value))
    }

    /// Removes a qualifier, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(to_lower_ascii(key).as_ref())
    }

    /// Returns the value for a key, if present. The lookup is case-insensitive.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(to_lower_ascii(key).as_ref())
            .map(String::as_str)
    }

    /// Returns true if the key is present. The lookup is case-insensitive.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if there are no qualifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of qualifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns an iterator over the qualifiers in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Folds and validates a qualifier key.
fn validate_key(key: &str) -> Result<String, QualifierError> {
    let Some(first) = key.chars().next() else {
        return Err(QualifierError::EmptyKey);
    };

    if let Some((position, char)) = key.chars().enumerate().find(|(_, c)| !is_key_char(*c)) {
        return Err(QualifierError::InvalidKeyChar {
            key: key.to_string(),
            char,
            position,
        });
    }

    if is_digit(first) {
        return Err(QualifierError::LeadingDigit {
            key: key.to_string(),
        });
    }

    Ok(to_lower_ascii(key).into_owned())
}

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={}", percent_encode(value))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Qualifiers {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Qualifiers {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Qualifiers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.entries.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Qualifiers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = BTreeMap::<String, String>::deserialize(deserializer)?;
        Self::try_from_pairs(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty() {
        let q = Qualifiers::parse("").unwrap();
        assert!(q.is_empty());
    }

    #[test]
    fn parse_multiple() {
        let q = Qualifiers::parse("arch=i386&distro=jessie").unwrap();
        assert_eq!(q.get("arch"), Some("i386"));
        assert_eq!(q.get("distro"), Some("jessie"));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn parse_folds_keys() {
        let q = Qualifiers::parse("Repository_URL=repo.spring.io").unwrap();
        assert_eq!(q.iter().next(), Some(("repository_url", "repo.spring.io")));
    }

    #[test]
    fn parse_decodes_values() {
        let q = Qualifiers::parse("checksum=sha1%3Aabc").unwrap();
        assert_eq!(q.get("checksum"), Some("sha1:abc"));
    }

    #[test]
    fn parse_drops_pairs_without_value() {
        let q = Qualifiers::parse("flag&empty=&arch=x86").unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.get("arch"), Some("x86"));
    }

    #[test]
    fn parse_duplicate_after_folding_fails() {
        let result = Qualifiers::parse("key=one&KEY=two");
        assert_eq!(
            result,
            Err(ErrorKind::InvalidQualifier(QualifierError::DuplicateKey {
                key: "key".to_string()
            }))
        );
    }

    #[test]
    fn parse_invalid_key_char_fails() {
        let result = Qualifiers::parse("in valid=x");
        assert!(matches!(
            result,
            Err(ErrorKind::InvalidQualifier(QualifierError::InvalidKeyChar {
                char: ' ',
                position: 2,
                ..
            }))
        ));
    }

    #[test]
    fn parse_leading_digit_key_fails() {
        let result = Qualifiers::parse("1arch=x86");
        assert!(matches!(
            result,
            Err(ErrorKind::InvalidQualifier(QualifierError::LeadingDigit { .. }))
        ));
    }

    #[test]
    fn parse_empty_key_fails() {
        let result = Qualifiers::parse("=x86");
        assert_eq!(result, Err(ErrorKind::InvalidQualifier(QualifierError::EmptyKey)));
    }

    #[test]
    fn parse_bad_escape_fails() {
        let result = Qualifiers::parse("a=%zz");
        assert!(matches!(
            result,
            Err(ErrorKind::InvalidEncoding {
                component: Component::Qualifiers,
                ..
            })
        ));
    }

    #[test]
    fn pairs_reject_empty_value() {
        let result = Qualifiers::try_from_pairs([("arch", "")]);
        assert_eq!(
            result,
            Err(QualifierError::EmptyValue {
                key: "arch".to_string()
            })
        );
    }

    #[test]
    fn pairs_reject_folded_duplicates() {
        let result = Qualifiers::try_from_pairs([("Arch", "a"), ("ARCH", "b")]);
        assert!(matches!(result, Err(QualifierError::DuplicateKey { .. })));
    }

    #[test]
    fn pairs_order_does_not_matter() {
        let a = Qualifiers::try_from_pairs([("a", "1"), ("b", "2")]).unwrap();
        let b = Qualifiers::try_from_pairs([("b", "2"), ("a", "1")]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "a=1&b=2");
    }

    #[test]
    fn display_encodes_values() {
        let q = Qualifiers::try_from_pairs([("repository_url", "https://repo/x y")]).unwrap();
        assert_eq!(q.to_string(), "repository_url=https%3A%2F%2Frepo%2Fx%20y");
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut q = Qualifiers::try_from_pairs([("channel", "stable")]).unwrap();
        assert_eq!(q.remove("CHANNEL"), Some("stable".to_string()));
        assert!(q.is_empty());
    }
}
