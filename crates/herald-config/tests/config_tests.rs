// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Herald configuration system.

use herald_config::diagnostic::ConfigError;
use herald_config::model::HeraldConfig;
use herald_config::{load_and_validate_str, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_herald_config() {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
allowed_origin = "https://example.com"
build_sha = "abc123"

[provider]
api_key = "test-key"
model = "gemini-2.5-flash"

[content]
dir = "/srv/content"

[stream]
timeout_secs = 120
channel_capacity = 8

[rate_limit]
chat_limit = 10
chat_window_secs = 60

[subject]
email = "jai@example.com"

[observability]
log_level = "debug"
json = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.allowed_origin, "https://example.com");
    assert_eq!(config.server.build_sha, "abc123");
    assert_eq!(config.provider.api_key.as_deref(), Some("test-key"));
    assert_eq!(config.provider.model, "gemini-2.5-flash");
    assert_eq!(config.content.dir, "/srv/content");
    assert_eq!(config.stream.timeout_secs, 120);
    assert_eq!(config.stream.channel_capacity, 8);
    assert_eq!(config.rate_limit.chat_limit, 10);
    assert_eq!(config.rate_limit.chat_window_secs, 60);
    assert_eq!(config.subject.email, "jai@example.com");
    assert_eq!(config.observability.log_level, "debug");
    assert!(config.observability.json);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").unwrap();
    let defaults = HeraldConfig::default();
    assert_eq!(config.server.port, defaults.server.port);
    assert_eq!(config.stream.timeout_secs, 300);
    assert_eq!(config.stream.request_timeout_secs, 30);
    assert_eq!(config.rate_limit.chat_limit, 60);
    assert_eq!(config.provider.model, "gemini-2.5-pro");
    assert_eq!(config.subject.linkedin, "https://www.linkedin.com/in/jrathore");
}

#[test]
fn unknown_field_in_stream_produces_suggestion() {
    let toml = r#"
[stream]
timout_secs = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } if key == "timout_secs" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("timeout_secs"));
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn wrong_type_produces_invalid_type_error() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port")))
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[stream]
channel_capacity = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero capacity is invalid");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("channel_capacity"))
    ));
}

#[test]
fn config_serializes_back_to_toml() {
    let config = HeraldConfig::default();
    let rendered = toml::to_string(&config).unwrap();
    assert!(rendered.contains("[stream]"));
    let reparsed = load_config_from_str(&rendered).unwrap();
    assert_eq!(reparsed.stream.channel_capacity, config.stream.channel_capacity);
}
