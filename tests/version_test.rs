//! Version comparison behaviour relied on by the scanner.

use preflight::version::{is_at_least, VersionNumber, DEFAULT_DELIMITER};

const SAMPLES: &[&str] = &[
    "0",
    "1.2",
    "1.2.0",
    "6.0.25",
    "14.38.33135.0",
    "92.0.902.67",
    "120.0.2210.91",
    "6.0-preview.1",
];

#[test]
fn equal_strings_are_always_met() {
    for v in SAMPLES {
        assert!(is_at_least(v, v, "."), "{} should meet itself", v);
    }
}

#[test]
fn ordered_pairs_are_met() {
    let ordered = [
        ("1.2.3", "1.2.4"),
        ("1.2.3", "1.3.0"),
        ("6.0.0", "6.0.25"),
        ("14.29.30133", "14.38.33135"),
        ("92.0.902.67", "120.0.2210.91"),
        ("9", "10"),
    ];
    for (required, candidate) in ordered {
        assert!(is_at_least(required, candidate, "."), "{} <= {}", required, candidate);
        assert!(
            !is_at_least(candidate, required, "."),
            "{} should not meet {}",
            required,
            candidate
        );
    }
}

#[test]
fn shorter_required_with_equal_prefix_is_met() {
    assert!(is_at_least("1.2", "1.2.9", "."));
}

#[test]
fn shorter_candidate_with_equal_prefix_is_met() {
    // A missing trailing segment is not treated as zero: the common prefix
    // decides and an equal prefix counts as met.
    assert!(is_at_least("1.2.0", "1.2", "."));
    assert!(is_at_least("1.2.5", "1.2", "."));
}

#[test]
fn non_numeric_suffix_is_ignored() {
    assert!(is_at_least("6.0", "6.0-preview.1", "."));
    let parsed = VersionNumber::parse("6.0-preview.1", DEFAULT_DELIMITER).unwrap();
    assert_eq!(&parsed.segments()[..2], &[6, 0]);
}

#[test]
fn unparseable_versions_are_assumed_met() {
    assert!(is_at_least("6.0.0", "garbage.x.y", "."));
    assert!(is_at_least("not-a-version.1", "1.0", "."));
}

#[test]
fn custom_delimiter() {
    assert!(is_at_least("6-0-25", "6-1-0", "-"));
    assert!(!is_at_least("6-1-0", "6-0-25", "-"));
}
