// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::HeraldConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &HeraldConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.allowed_origin.trim().is_empty() {
        fail("server.allowed_origin must not be empty".to_string());
    }

    if config.provider.model.trim().is_empty() {
        fail("provider.model must not be empty".to_string());
    }

    if !config.provider.base_url.starts_with("http://")
        && !config.provider.base_url.starts_with("https://")
    {
        fail(format!(
            "provider.base_url must be an http(s) URL, got `{}`",
            config.provider.base_url
        ));
    }

    for (key, value) in [
        ("provider.classify_temperature", config.provider.classify_temperature),
        ("provider.chat_temperature", config.provider.chat_temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            fail(format!("{key} must be between 0.0 and 2.0, got {value}"));
        }
    }

    if config.content.dir.trim().is_empty() {
        fail("content.dir must not be empty".to_string());
    }

    if config.stream.timeout_secs == 0 {
        fail("stream.timeout_secs must be at least 1".to_string());
    }

    if config.stream.request_timeout_secs == 0 {
        fail("stream.request_timeout_secs must be at least 1".to_string());
    }

    if config.stream.channel_capacity == 0 {
        fail("stream.channel_capacity must be at least 1".to_string());
    }

    if config.rate_limit.chat_limit == 0 {
        fail("rate_limit.chat_limit must be at least 1".to_string());
    }

    if config.rate_limit.chat_window_secs == 0 {
        fail("rate_limit.chat_window_secs must be at least 1".to_string());
    }

    if !config.subject.email.contains('@') {
        fail(format!(
            "subject.email `{}` is not an e-mail address",
            config.subject.email
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&HeraldConfig::default()).is_ok());
    }

    #[test]
    fn zero_channel_capacity_fails_validation() {
        let mut config = HeraldConfig::default();
        config.stream.channel_capacity = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "channel_capacity"));
    }

    #[test]
    fn bad_host_fails_validation() {
        let mut config = HeraldConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.host"));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = HeraldConfig::default();
        config.provider.chat_temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "chat_temperature"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = HeraldConfig::default();
        config.stream.timeout_secs = 0;
        config.rate_limit.chat_limit = 0;
        config.content.dir = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
