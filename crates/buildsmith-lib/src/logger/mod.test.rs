use super::*;

#[test]
fn test_filter_directive_scopes_level_to_buildsmith() {
    assert_eq!(
        filter_directive(LogLevel::Debug),
        "warn,buildsmith=debug,buildsmith_lib=debug"
    );
    assert_eq!(
        filter_directive(LogLevel::Error),
        "warn,buildsmith=error,buildsmith_lib=error"
    );
}

#[test]
fn test_filter_directive_parses() {
    for level in [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        assert!(EnvFilter::try_new(filter_directive(level)).is_ok());
    }
}

#[test]
fn test_logger_global_matches_initialized_flag() {
    // Other tests may or may not have initialized the logger
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}

#[test]
fn test_second_init_is_rejected() {
    let config = LoggerConfig {
        level: LogLevel::Error,
        format: LogFormat::Text,
        output: LogOutput::Stderr,
        color: false,
    };
    // First call may fail if another test won the race; the second never succeeds
    let _ = Logger::init(config.clone());
    assert!(Logger::init(config).is_err());
}
