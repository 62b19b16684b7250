// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty bind addresses and non-zero windows.

use crate::diagnostic::ConfigError;
use crate::model::{LimitClassConfig, OpslineConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &OpslineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.auth.token_ttl_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.token_ttl_minutes must be greater than zero".to_string(),
        });
    }

    validate_limit_class("limits.chat", &config.limits.chat, &mut errors);
    validate_limit_class("limits.auth", &config.limits.auth, &mut errors);
    validate_limit_class("limits.agent", &config.limits.agent, &mut errors);

    if config.completion.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "completion.timeout_secs must be greater than zero".to_string(),
        });
    }

    let base_url = config.completion.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("completion.base_url `{base_url}` must be an http(s) URL"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_limit_class(section: &str, class: &LimitClassConfig, errors: &mut Vec<ConfigError>) {
    if class.max_requests == 0 {
        errors.push(ConfigError::Validation {
            message: format!("{section}.max_requests must be greater than zero"),
        });
    }
    if class.window_ms == 0 {
        errors.push(ConfigError::Validation {
            message: format!("{section}.window_ms must be greater than zero"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&OpslineConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = OpslineConfig::default();
        config.server.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("server.host")));
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = OpslineConfig::default();
        config.limits.chat.window_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("limits.chat.window_ms"))
        );
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = OpslineConfig::default();
        config.server.host = String::new();
        config.auth.token_ttl_minutes = 0;
        config.completion.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = OpslineConfig::default();
        config.completion.base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }
}
