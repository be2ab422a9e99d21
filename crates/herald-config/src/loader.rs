// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/herald/herald.toml`
//! 3. `~/.config/herald/herald.toml`
//! 4. `./herald.toml`
//! 5. `HERALD_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HeraldConfig;

/// Section names, longest first so `rate_limit_` wins over any shorter prefix.
const SECTIONS: &[&str] = &[
    "observability",
    "rate_limit",
    "provider",
    "content",
    "subject",
    "server",
    "stream",
];

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/herald/herald.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "herald.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("herald/herald.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<HeraldConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HeraldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HeraldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Maps a prefix-stripped, lowercased env key to its dotted config path.
///
/// Splitting on every `_` would turn `HERALD_STREAM_TIMEOUT_SECS` into
/// `stream.timeout.secs`, so only the section prefix is converted.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            && !rest.is_empty()
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("HERALD_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_section_prefix_only() {
        assert_eq!(map_env_key("stream_timeout_secs"), "stream.timeout_secs");
        assert_eq!(map_env_key("provider_api_key"), "provider.api_key");
        assert_eq!(map_env_key("rate_limit_chat_limit"), "rate_limit.chat_limit");
        assert_eq!(map_env_key("server_port"), "server.port");
    }

    #[test]
    fn leaves_unknown_keys_untouched() {
        assert_eq!(map_env_key("mystery"), "mystery");
        assert_eq!(map_env_key("server"), "server");
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERALD_SERVER_PORT", "9090");
            jail.set_env("HERALD_STREAM_CHANNEL_CAPACITY", "4");
            let config = load_config()?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.stream.channel_capacity, 4);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "herald.toml",
                r#"
[subject]
email = "someone@example.com"
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.subject.email, "someone@example.com");
            Ok(())
        });
    }
}
