//! Property-based tests for version identifiers
//!
//! These tests verify that the compatibility algebra holds across a wide
//! range of generated versions, not only the released ones.

use aktorz_schemas::VersionId;
use proptest::prelude::*;

/// Strategy for versions close enough together to share majors and minors
fn version_strategy() -> impl Strategy<Value = VersionId> {
    (
        0u64..3,
        0u64..4,
        0u64..4,
        proptest::option::of(1u64..4),
        proptest::option::of("[a-z0-9]{1,6}"),
    )
        .prop_map(|(major, minor, patch, rc, build)| {
            let mut text = format!("v{major}.{minor}.{patch}");
            if let Some(rc) = rc {
                text.push_str(&format!("-rc{rc}"));
            }
            if let Some(build) = build {
                text.push('+');
                text.push_str(&build);
            }
            VersionId::parse(&text).expect("generated version parses")
        })
}

proptest! {
    #[test]
    fn display_round_trips(version in version_strategy()) {
        let reparsed = VersionId::parse(&version.to_string()).unwrap();
        prop_assert_eq!(reparsed.to_string(), version.to_string());
        prop_assert_eq!(reparsed, version);
    }

    #[test]
    fn read_and_write_are_reflexive(version in version_strategy()) {
        prop_assert!(version.can_read(&version));
        prop_assert!(version.can_write(&version));
    }

    #[test]
    fn read_is_symmetric(a in version_strategy(), b in version_strategy()) {
        prop_assert_eq!(a.can_read(&b), b.can_read(&a));
    }

    #[test]
    fn write_implies_read(a in version_strategy(), b in version_strategy()) {
        if a.can_write(&b) {
            prop_assert!(a.can_read(&b));
        }
    }

    #[test]
    fn write_never_goes_forward(a in version_strategy(), b in version_strategy()) {
        if a.can_write(&b) && a != b {
            prop_assert!(b.precedes(&a));
        }
    }

    #[test]
    fn build_metadata_never_distinguishes(version in version_strategy(), build in "[a-z0-9]{1,6}") {
        let text = format!("{}+{}", version.finalize(), build);
        let with_build = VersionId::parse(&text).unwrap();
        prop_assert_eq!(with_build, version.finalize());
    }

    #[test]
    fn finalize_is_idempotent(version in version_strategy()) {
        let finalized = version.finalize();
        prop_assert!(!finalized.is_prerelease());
        prop_assert!(finalized.build().is_none());
        prop_assert_eq!(finalized.finalize(), finalized.clone());
        prop_assert!(finalized.succeeds(&version));
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,20}") {
        let _ = VersionId::parse(&text);
    }
}
