// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./opsline.toml` > `~/.config/opsline/opsline.toml`
//! > `/etc/opsline/opsline.toml` with environment variable overrides via the
//! `OPSLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::OpslineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/opsline/opsline.toml` (system-wide)
/// 3. `~/.config/opsline/opsline.toml` (user XDG config)
/// 4. `./opsline.toml` (local directory)
/// 5. `OPSLINE_*` environment variables
pub fn load_config() -> Result<OpslineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpslineConfig::default()))
        .merge(Toml::file("/etc/opsline/opsline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("opsline/opsline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("opsline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<OpslineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpslineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OpslineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpslineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `OPSLINE_AUTH_SIGNING_SECRET` must map to
/// `auth.signing_secret`, not `auth.signing.secret`. Nested limit classes are
/// mapped before `auth_` so `limits_auth_*` keys take the longer match.
fn env_provider() -> Env {
    Env::prefixed("OPSLINE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("limits_chat_", "limits.chat.", 1)
            .replacen("limits_auth_", "limits.auth.", 1)
            .replacen("limits_agent_", "limits.agent.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("completion_", "completion.", 1);
        mapped.into()
    })
}
