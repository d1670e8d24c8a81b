//! Property-based tests for the purl grammar and canonical form.
//!
//! These tests generate random components, render them through the canonical
//! form, and check the parser recovers the same values.

use proptest::prelude::*;

use pkg_url::codec::{is_unreserved, percent_decode, percent_encode};
use pkg_url::{PackageUrl, Qualifiers, is_known_type};

/// Strategies for generating valid purl components.
mod strategies {
    use super::*;

    /// Generate a lower-case type without a built-in policy
    pub fn package_type() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9.+-]{0,10}".prop_filter("type has a built-in policy", |t| !is_known_type(t))
    }

    /// Generate a decoded segment: any printable text without `/`
    pub fn segment() -> impl Strategy<Value = String> {
        "[^/\\p{C}]{1,12}"
    }

    /// Generate a subpath segment, which also excludes `.` and `..`
    pub fn subpath_segment() -> impl Strategy<Value = String> {
        segment().prop_filter("dot segment", |s| s != "." && s != "..")
    }

    /// Generate a lower-case qualifier key
    pub fn key() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9._-]{0,8}"
    }

    /// Generate a non-empty qualifier value
    pub fn value() -> impl Strategy<Value = String> {
        "\\PC{1,16}"
    }

    /// Generate a qualifier map with unique keys
    pub fn qualifiers() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::btree_map(key(), value(), 0..5)
            .prop_map(|map| map.into_iter().collect())
    }

    /// Generate decoded components for a pass-through type
    pub fn components() -> impl Strategy<
        Value = (
            String,
            Option<String>,
            String,
            Option<String>,
            Vec<(String, String)>,
            Option<String>,
        ),
    > {
        (
            package_type(),
            prop::option::of(prop::collection::vec(segment(), 1..4).prop_map(|s| s.join("/"))),
            "\\PC{1,16}",
            prop::option::of("\\PC{1,12}"),
            qualifiers(),
            prop::option::of(
                prop::collection::vec(subpath_segment(), 1..4).prop_map(|s| s.join("/")),
            ),
        )
    }
}

mod codec_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn percent_round_trip(s in "\\PC*") {
            let encoded = percent_encode(&s);
            let decoded = percent_decode(&encoded).unwrap();
            prop_assert_eq!(decoded.as_ref(), s.as_str());
        }

        #[test]
        fn encoded_output_is_unreserved_or_escape(s in "\\PC*") {
            let encoded = percent_encode(&s);
            let mut chars = encoded.chars();
            while let Some(c) = chars.next() {
                if c == '%' {
                    let hi = chars.next().unwrap();
                    let lo = chars.next().unwrap();
                    prop_assert!(hi.is_ascii_hexdigit() && !hi.is_ascii_lowercase());
                    prop_assert!(lo.is_ascii_hexdigit() && !lo.is_ascii_lowercase());
                } else {
                    prop_assert!(is_unreserved(c), "unexpected {:?} in {}", c, encoded);
                }
            }
        }

        #[test]
        fn unreserved_input_is_unchanged(s in "[A-Za-z0-9._~-]*") {
            let encoded = percent_encode(&s);
            prop_assert_eq!(encoded.as_ref(), s.as_str());
        }
    }
}

mod canonical_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn constructed_purls_round_trip(
            (t, ns, name, version, quals, subpath) in components()
        ) {
            let purl = PackageUrl::from_components(
                &t,
                ns.as_deref(),
                &name,
                version.as_deref(),
                quals,
                subpath.as_deref(),
            ).unwrap();

            let canonical = purl.to_string();
            let reparsed = PackageUrl::parse(&canonical).unwrap();
            prop_assert_eq!(&reparsed, &purl);
            prop_assert_eq!(reparsed.to_string(), canonical);
        }

        #[test]
        fn components_survive_canonicalization(
            (t, ns, name, version, quals, subpath) in components()
        ) {
            let purl = PackageUrl::from_components(
                &t,
                ns.as_deref(),
                &name,
                version.as_deref(),
                quals.clone(),
                subpath.as_deref(),
            ).unwrap();
            let reparsed = PackageUrl::parse(&purl.to_string()).unwrap();

            prop_assert_eq!(reparsed.package_type(), t.as_str());
            prop_assert_eq!(reparsed.namespace(), ns.as_deref());
            prop_assert_eq!(reparsed.name(), name.as_str());
            prop_assert_eq!(reparsed.version(), version.as_deref());
            prop_assert_eq!(reparsed.subpath(), subpath.as_deref());
            for (key, value) in &quals {
                prop_assert_eq!(reparsed.qualifiers().get(key), Some(value.as_str()));
            }
        }

        #[test]
        fn qualifier_order_is_irrelevant(
            quals in qualifiers().prop_flat_map(|q| {
                let shuffled = Just(q.clone()).prop_shuffle();
                (Just(q), shuffled)
            })
        ) {
            let (ordered, shuffled) = quals;
            let a =
                PackageUrl::from_components("generic", None, "n", None, ordered, None).unwrap();
            let b =
                PackageUrl::from_components("generic", None, "n", None, shuffled, None).unwrap();
            prop_assert_eq!(a.to_string(), b.to_string());
        }

        #[test]
        fn type_case_is_folded(t in package_type()) {
            let upper = PackageUrl::parse(&format!("pkg:{}/name", t.to_ascii_uppercase())).unwrap();
            prop_assert_eq!(upper.package_type(), t.as_str());
        }

        #[test]
        fn key_case_is_folded(k in key(), v in "[a-z0-9]{1,8}") {
            let input = format!("pkg:generic/name?{}={v}", k.to_ascii_uppercase());
            let purl = PackageUrl::parse(&input).unwrap();
            prop_assert_eq!(purl.qualifiers().iter().next(), Some((k.as_str(), v.as_str())));
        }
    }
}

mod rejection_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn numeric_leading_type_is_rejected(d in 0u8..10, rest in "[a-z]{0,6}") {
            let input = format!("pkg:{d}{rest}/name");
            prop_assert!(PackageUrl::parse(&input).is_err());
        }

        #[test]
        fn numeric_leading_key_is_rejected(d in 0u8..10, rest in "[a-z]{0,6}") {
            let input = format!("pkg:generic/name?{d}{rest}=x");
            prop_assert!(PackageUrl::parse(&input).is_err());
        }

        #[test]
        fn folded_duplicate_keys_are_rejected(k in "[a-z]{1,8}") {
            let input = format!("pkg:generic/name?{k}=one&{}=two", k.to_ascii_uppercase());
            prop_assert!(PackageUrl::parse(&input).is_err());
        }

        #[test]
        fn non_pkg_scheme_is_rejected(scheme in "[a-z]{1,8}", t in package_type()) {
            prop_assume!(scheme != "pkg");
            let input = format!("{scheme}:{t}/name");
            prop_assert!(PackageUrl::parse(&input).is_err());
        }
    }

    #[test]
    fn empty_qualifier_value_is_dropped_when_parsing() {
        let purl = PackageUrl::parse("pkg:generic/name?a=&b=1").unwrap();
        assert_eq!(purl.qualifiers(), &Qualifiers::try_from_pairs([("b", "1")]).unwrap());
    }
}
