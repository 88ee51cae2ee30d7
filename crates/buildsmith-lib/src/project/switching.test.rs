use crate::application::session_mocks::MockDefineRegistry;
use crate::primitives::BuildMode;

fn suite() -> ProjectConfig {
    let mut config = ProjectConfig::new("Suite", BuildMode::Wildcard, "Builds");
    config.add_variant("Orbit", "").expect("add orbit");
    config.add_variant("Nebula", "").expect("add nebula");
    config
}

fn set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_switch_replaces_variant_symbol_and_keeps_others() -> Result<()> {
    let config = suite();
    let registry = MockDefineRegistry::new().with_symbols("standalone", &["ORBIT", "ENABLE_LOGS"]);

    let switched = switch_variant(&config, &registry, "standalone", "nebula")?;

    assert_eq!(switched.code_name, "Nebula");
    assert_eq!(registry.symbols("standalone"), set(&["ENABLE_LOGS", "NEBULA"]));
    Ok(())
}

#[test]
fn test_switch_only_touches_requested_group() -> Result<()> {
    let config = suite();
    let registry = MockDefineRegistry::new()
        .with_symbols("standalone", &["ORBIT"])
        .with_symbols("android", &["ORBIT"]);

    switch_variant(&config, &registry, "standalone", "Nebula")?;

    assert_eq!(registry.symbols("android"), set(&["ORBIT"]));
    Ok(())
}

#[test]
fn test_switch_to_unknown_variant_fails() {
    let config = suite();
    let registry = MockDefineRegistry::new().with_symbols("standalone", &["ORBIT"]);

    let err = switch_variant(&config, &registry, "standalone", "Comet").unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProjectError>(),
        Some(ProjectError::UnknownVariant { .. })
    ));
    assert_eq!(registry.symbols("standalone"), set(&["ORBIT"]));
}

#[test]
fn test_switched_symbols_clears_every_variant_symbol() {
    let config = suite();
    let nebula = config.variant("Nebula").expect("nebula");

    let next = switched_symbols(&config, &set(&["ORBIT", "NEBULA", "DEBUG_HUD"]), nebula);
    assert_eq!(next, set(&["DEBUG_HUD", "NEBULA"]));
}

#[test]
fn test_active_variant_follows_defines() -> Result<()> {
    let config = suite();
    let registry = MockDefineRegistry::new().with_symbols("standalone", &["NEBULA"]);

    let active = active_variant(&config, &registry, "standalone")?.expect("active");
    assert_eq!(active.code_name, "Nebula");

    switch_variant(&config, &registry, "standalone", "Orbit")?;
    let active = active_variant(&config, &registry, "standalone")?.expect("active");
    assert_eq!(active.code_name, "Orbit");
    Ok(())
}

#[test]
fn test_active_variant_defaults_to_first_without_defines() -> Result<()> {
    let config = suite();
    let registry = MockDefineRegistry::new();

    let active = active_variant(&config, &registry, "webgl")?.expect("active");
    assert_eq!(active.code_name, "Orbit");
    assert!(current_defines(&registry, "webgl")?.is_empty());
    Ok(())
}
