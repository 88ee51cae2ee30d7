use super::*;

fn env_config(
    no_color: Option<&str>,
    force_color: Option<&str>,
    clicolor: Option<&str>,
    ci: Option<&str>,
) -> EnvironmentConfig {
    EnvironmentConfig {
        no_color: no_color.map(String::from),
        force_color: force_color.map(String::from),
        clicolor: clicolor.map(String::from),
        ci: ci.map(String::from),
    }
}

#[test]
fn test_no_color_environment_variable() {
    let env = env_config(Some("1"), None, None, None);
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Never);
}

#[test]
fn test_force_color_environment_variable() {
    let env = env_config(None, Some("1"), None, None);
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Always);
}

#[test]
fn test_environment_variable_precedence() {
    // FORCE_COLOR wins over NO_COLOR and CLICOLOR
    let env = env_config(Some("1"), Some("1"), Some("0"), None);
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Always);
}

#[test]
fn test_ci_environment_variable() {
    let env = env_config(None, Some("1"), None, Some("true"));
    assert_eq!(env.apply_color_config(ColorIntent::Always), ColorIntent::Never);
}

#[test]
fn test_clicolor_zero_disables_color() {
    let env = env_config(None, None, Some("0"), None);
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Never);
}

#[test]
fn test_empty_no_color_is_ignored() {
    let env = env_config(Some(""), None, None, None);
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Auto);
}

#[test]
fn test_invalid_force_color_values_ignored() {
    let env = env_config(None, Some("invalid"), None, None);
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Auto);
}

#[test]
fn test_force_color_false_disables_color() {
    let env = env_config(None, Some("false"), None, None);
    assert_eq!(env.apply_color_config(ColorIntent::Always), ColorIntent::Never);
}
