use buildsmith_lib::application::config::AppConfig;
use buildsmith_lib::primitives::{ColorIntent, ConfigError, LogFormat};

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert_eq!(config.color, ColorIntent::Auto);
    assert_eq!(config.target_group, "standalone");
    assert!(config.build_command.is_none());
    assert!(!config.yes);
}

#[test]
fn test_config_merging_integration() {
    let base_config = AppConfig::default();
    let override_config = AppConfig {
        log_level: 3,
        log_format: LogFormat::Json,
        build_command: Some("./ci/build.sh".to_string()),
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.build_command.as_deref(), Some("./ci/build.sh"));
    assert_eq!(merged.color, ColorIntent::Never);

    // Untouched fields keep their defaults
    assert_eq!(merged.target_group, "standalone");
}

#[test]
fn test_validate_rejects_missing_workdir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = AppConfig {
        workdir: Some(dir.path().join("does-not-exist")),
        ..AppConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}

#[test]
fn test_validate_accepts_existing_workdir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        ..AppConfig::default()
    };

    assert!(config.validate().is_ok());
    assert_eq!(config.workdir.as_deref(), Some(dir.path()));
}
