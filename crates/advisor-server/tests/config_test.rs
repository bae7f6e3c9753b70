use advisor_server::config::{load_config_with_env, ConfigError};
use std::io::Write;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_file_values_and_env_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[server]
port = 9100
public_url = "https://calls.example.com"

[call]
max_turns = 5

[call.script]
greeting = "Advisor here. What's the decision?"

[audio]
max_clips = 50
"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let config = load_config_with_env(Some(path), no_env).unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.public_url, "https://calls.example.com");
    assert_eq!(config.call.max_turns, 5);
    assert_eq!(config.call.script.greeting, "Advisor here. What's the decision?");
    assert_eq!(config.audio.max_clips, 50);
    assert_eq!(config.call.min_confidence, 0.3);

    let config = load_config_with_env(Some(path), |name| match name {
        "ADVISOR_PORT" => Some("9200".to_string()),
        "ADVISOR_MAX_TURNS" => Some("2".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.server.port, 9200);
    assert_eq!(config.call.max_turns, 2);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let config = load_config_with_env(path.to_str(), no_env).unwrap();
    assert_eq!(config.call.max_turns, 10);
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[server\nport = ").unwrap();

    let result = load_config_with_env(file.path().to_str(), no_env);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_out_of_range_confidence_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[call]\nmin_confidence = 1.5\n").unwrap();

    let result = load_config_with_env(file.path().to_str(), no_env);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_zero_turn_timeout_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[call]\nturn_timeout_ms = 0\n").unwrap();

    let result = load_config_with_env(file.path().to_str(), no_env);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
