// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Opsline configuration system.

use opsline_config::diagnostic::ConfigError;
use opsline_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_opsline_config() {
    let toml = r#"
[service]
name = "opsline-staging"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9100

[auth]
signing_secret = "super-secret"
bootstrap_secret = "boot"
token_ttl_minutes = 120

[limits.chat]
max_requests = 10
window_ms = 30000

[limits.auth]
max_requests = 3
window_ms = 600000

[limits.agent]
max_requests = 200
window_ms = 60000

[completion]
api_key = "sk-test"
base_url = "https://completions.internal.example"
timeout_secs = 15
enabled_by_default = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "opsline-staging");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.auth.signing_secret.as_deref(), Some("super-secret"));
    assert_eq!(config.auth.token_ttl_minutes, 120);
    assert_eq!(config.limits.chat.max_requests, 10);
    assert_eq!(config.limits.auth.window_ms, 600_000);
    assert_eq!(config.limits.agent.max_requests, 200);
    assert_eq!(config.completion.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.completion.timeout_secs, 15);
    assert!(!config.completion.enabled_by_default);
}

/// Unknown field produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[auth]
singing_secret = "oops"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "singing_secret");
            assert_eq!(suggestion.as_deref(), Some("signing_secret"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[server]
port = "not-a-number"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. }))
    );
}

/// Semantic validation runs after successful deserialization.
#[test]
fn semantic_validation_catches_zero_limits() {
    let toml = r#"
[limits.chat]
max_requests = 0
window_ms = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors.len() >= 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Missing completion credentials are not an error: the guard simply starts
/// unconfigured.
#[test]
fn missing_completion_api_key_is_valid() {
    let config = load_and_validate_str("").expect("empty config should be valid");
    assert!(config.completion.api_key.is_none());
}

/// Loading from an explicit path picks up the file's values.
#[test]
fn load_from_explicit_path() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[server]\nport = 9200").expect("write config");

    let config =
        opsline_config::load_config_from_path(file.path()).expect("file should deserialize");
    assert_eq!(config.server.port, 9200);
    assert_eq!(config.service.name, "opsline");
}
