// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Opsline triage engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Opsline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpslineConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Identity gate settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Admission limiter settings, one sub-section per traffic class.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// External completion service settings.
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "opsline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8700
}

/// Identity gate configuration.
///
/// When `signing_secret` is unset, authenticated routes fail closed: every
/// bearer token is rejected.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC signing secret for bearer tokens. Unset = auth fails closed.
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Shared secret for the token-issue endpoint. Unset = endpoint disabled.
    #[serde(default)]
    pub bootstrap_secret: Option<String>,

    /// Lifetime of issued tokens in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            bootstrap_secret: None,
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

fn default_token_ttl_minutes() -> u64 {
    60
}

/// Admission limiter configuration, one independent (max, window) pair per
/// traffic class.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Conversational messages: high volume, short window.
    #[serde(default = "default_chat_limit")]
    pub chat: LimitClassConfig,

    /// Authentication attempts: low volume, longer window.
    #[serde(default = "default_auth_limit")]
    pub auth: LimitClassConfig,

    /// Machine/agent calls: higher volume ceiling.
    #[serde(default = "default_agent_limit")]
    pub agent: LimitClassConfig,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            chat: default_chat_limit(),
            auth: default_auth_limit(),
            agent: default_agent_limit(),
        }
    }
}

/// A single admission limit: at most `max_requests` per rolling `window_ms`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitClassConfig {
    pub max_requests: u32,
    pub window_ms: u64,
}

fn default_chat_limit() -> LimitClassConfig {
    LimitClassConfig {
        max_requests: 30,
        window_ms: 60_000,
    }
}

fn default_auth_limit() -> LimitClassConfig {
    LimitClassConfig {
        max_requests: 5,
        window_ms: 900_000,
    }
}

fn default_agent_limit() -> LimitClassConfig {
    LimitClassConfig {
        max_requests: 120,
        window_ms: 60_000,
    }
}

/// External completion service configuration.
///
/// A missing `api_key` means the completion guard is unconfigured and behaves
/// permanently disabled. It is never a startup error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// Credential for the completion service. Unset = guard unconfigured.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the completion service.
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Per-call deadline in seconds. A hung call must not block other requests.
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether the guard starts enabled. Mutable at runtime via the admin API.
    #[serde(default = "default_guard_enabled")]
    pub enabled_by_default: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_base_url(),
            timeout_secs: default_completion_timeout_secs(),
            enabled_by_default: default_guard_enabled(),
        }
    }
}

fn default_completion_base_url() -> String {
    "http://127.0.0.1:8900".to_string()
}

fn default_completion_timeout_secs() -> u64 {
    30
}

fn default_guard_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = OpslineConfig::default();
        assert_eq!(config.service.name, "opsline");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.auth.signing_secret.is_none());
        assert!(config.completion.api_key.is_none());
        assert!(config.completion.enabled_by_default);
    }

    #[test]
    fn limit_classes_have_distinct_defaults() {
        let limits = LimitsConfig::default();
        assert!(limits.agent.max_requests > limits.chat.max_requests);
        assert!(limits.auth.window_ms > limits.chat.window_ms);
        assert!(limits.auth.max_requests < limits.chat.max_requests);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = "[service]\nnaem = \"typo\"\n";
        let result: Result<OpslineConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
