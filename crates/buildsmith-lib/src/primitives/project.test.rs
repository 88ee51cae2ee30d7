#[test]
fn test_extension_table() {
    assert_eq!(BuildTarget::StandaloneWindows64.extension(), ".exe");
    assert_eq!(BuildTarget::StandaloneWindows.extension(), ".exe");
    assert_eq!(BuildTarget::StandaloneOsx.extension(), ".app");
    assert_eq!(BuildTarget::Android.extension(), ".apk");
    assert_eq!(BuildTarget::StandaloneLinux64.extension(), "");
    assert_eq!(BuildTarget::Other("switch".into()).extension(), "");
}

#[test]
fn test_only_desktop_targets_produce_directories() {
    assert!(BuildTarget::StandaloneWindows64.family().produces_directory());
    assert!(BuildTarget::StandaloneOsx.family().produces_directory());
    assert!(BuildTarget::StandaloneLinux64.family().produces_directory());
    assert!(!BuildTarget::Android.family().produces_directory());
    assert!(!BuildTarget::WebGl.family().produces_directory());
}

#[test]
fn test_build_target_parse_aliases() {
    assert_eq!(BuildTarget::from("win64"), BuildTarget::StandaloneWindows64);
    assert_eq!(BuildTarget::from("MacOS"), BuildTarget::StandaloneOsx);
    assert_eq!(BuildTarget::from("android"), BuildTarget::Android);
    assert_eq!(
        BuildTarget::from("ps5"),
        BuildTarget::Other("ps5".to_string())
    );
}

#[test]
fn test_build_target_serializes_as_id() {
    let json = serde_json::to_string(&BuildTarget::StandaloneLinux64).unwrap();
    assert_eq!(json, "\"standalone-linux64\"");

    let unknown: BuildTarget = serde_json::from_str("\"ps5\"").unwrap();
    assert_eq!(unknown.to_string(), "ps5");
}

#[test]
fn test_target_groups() {
    assert_eq!(BuildTarget::StandaloneOsx.group(), "standalone");
    assert_eq!(BuildTarget::Android.group(), "android");
}

#[test]
fn test_wizard_step_navigation_is_linear() {
    let mut step = WizardStep::Mode;
    let mut visited = vec![step];
    while let Some(next) = step.next() {
        assert_eq!(next.previous(), Some(step));
        step = next;
        visited.push(step);
    }
    assert_eq!(visited.len(), 6);
    assert_eq!(step, WizardStep::Complete);
    assert_eq!(WizardStep::Mode.previous(), None);
}

#[test]
fn test_build_mode_and_version_part_parse() {
    assert_eq!("wildcard".parse::<BuildMode>().unwrap(), BuildMode::Wildcard);
    assert_eq!("Single".parse::<BuildMode>().unwrap(), BuildMode::Single);
    assert_eq!("minor".parse::<VersionPart>().unwrap(), VersionPart::Minor);
    assert!("build".parse::<VersionPart>().is_err());
}
