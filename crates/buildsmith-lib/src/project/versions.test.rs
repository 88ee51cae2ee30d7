#[test]
fn test_patch_increment() {
    for (a, b, c) in [(0, 0, 0), (1, 2, 3), (10, 0, 99)] {
        let version = format!("{}.{}.{}", a, b, c);
        assert_eq!(
            increment(&version, VersionPart::Patch).unwrap(),
            format!("{}.{}.{}", a, b, c + 1)
        );
    }
}

#[test]
fn test_increment_at_component_limit_is_rejected() {
    let version = format!("1.2.{}", u64::MAX);
    let err = increment(&version, VersionPart::Patch).unwrap_err();
    match err {
        VersionError::ParseError { reason, .. } => assert!(reason.contains("overflows")),
    }

    let top = VersionTriple::new(u64::MAX, 0, 0);
    assert!(top.bumped(VersionPart::Major).is_err());
    assert_eq!(
        top.bumped(VersionPart::Minor).unwrap(),
        VersionTriple::new(u64::MAX, 1, 0)
    );
}

#[test]
fn test_minor_increment_keeps_patch() {
    assert_eq!(increment("1.2.3", VersionPart::Minor).unwrap(), "1.3.3");
}

#[test]
fn test_major_increment_keeps_lower_components() {
    assert_eq!(increment("1.2.3", VersionPart::Major).unwrap(), "2.2.3");
}

#[test]
fn test_missing_components_default_to_zero() {
    assert_eq!(increment("1.2", VersionPart::Patch).unwrap(), "1.2.1");
    assert_eq!(increment("4", VersionPart::Minor).unwrap(), "4.1.0");
    assert_eq!(parse("7").unwrap(), VersionTriple::new(7, 0, 0));
}

#[test]
fn test_non_numeric_component_is_rejected() {
    let err = increment("1.x.3", VersionPart::Patch).unwrap_err();
    match err {
        VersionError::ParseError { value, reason } => {
            assert_eq!(value, "1.x.3");
            assert!(reason.contains("'x'"));
        }
    }
    assert!(parse("1.2.3-beta").is_err());
    assert!(parse("1..3").is_err());
}

#[test]
fn test_empty_and_overlong_versions_are_rejected() {
    assert!(parse("").is_err());
    assert!(parse("   ").is_err());
    assert!(parse("1.2.3.4").is_err());
}

#[test]
fn test_artifact_segment() {
    assert_eq!(parse("1.0").unwrap().artifact_segment(), "1-0-0");
    assert_eq!(
        "2.10.4".parse::<VersionTriple>().unwrap().artifact_segment(),
        "2-10-4"
    );
}
