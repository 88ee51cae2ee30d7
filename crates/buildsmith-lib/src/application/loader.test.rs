use super::*;
use crate::primitives::{ColorIntent, LogFormat, LogLevel, LogOutput};
use tempfile::TempDir;

#[test]
fn test_config_loading_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 0);
    assert_eq!(config.color, ColorIntent::Auto);
    assert_eq!(config.target_group, "standalone");
    assert!(config.build_command.is_none());
    assert!(!config.yes);
}

#[test]
fn test_config_merging() {
    let base = AppConfig::default();
    let override_config = AppConfig {
        log_level: 4,
        color: ColorIntent::Always,
        build_command: Some("make player".to_string()),
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.color, ColorIntent::Always);
    assert_eq!(merged.build_command.as_deref(), Some("make player"));
    assert_eq!(merged.target_group, "standalone");
}

#[test]
fn test_merge_keeps_base_when_other_is_default() {
    let base = AppConfig {
        log_format: LogFormat::Json,
        log_output: LogOutput::Stdout,
        target_group: "android".to_string(),
        ..AppConfig::default()
    };

    let merged = base.merge_with(AppConfig::default());
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.log_output, LogOutput::Stdout);
    assert_eq!(merged.target_group, "android");
}

#[test]
fn test_validate_rejects_missing_workdir() {
    let mut config = AppConfig {
        workdir: Some("/definitely/not/a/real/buildsmith/dir".into()),
        ..AppConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}

#[test]
fn test_validate_accepts_existing_workdir() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        ..AppConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.workdir.as_deref(), Some(dir.path()));
}

#[test]
fn test_validate_rejects_empty_target_group() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        target_group: "  ".to_string(),
        ..AppConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_logger_config_follows_app_config() {
    let config = AppConfig {
        log_level: 3,
        log_format: LogFormat::Pretty,
        color: ColorIntent::Never,
        ..AppConfig::default()
    };
    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Debug);
    assert_eq!(logger.format, LogFormat::Pretty);
    assert!(!logger.color);
}
