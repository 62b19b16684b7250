// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opsline serve` command implementation.
//!
//! Wires the identity gate, admission limiter, completion guard, and
//! interaction router from configuration and runs the HTTP gateway until
//! interrupted.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use opsline_config::model::OpslineConfig;
use opsline_core::{CompletionProvider, OpslineError};
use opsline_gateway::{
    AdmissionLimiter, AdmissionLimits, GatewayState, IdentityGate, LimitSpec, start_server,
};
use opsline_guard::{CompletionClient, CompletionGuard};
use opsline_router::InteractionRouter;

/// Runs the `opsline serve` command.
pub async fn run_serve(config: OpslineConfig) -> Result<(), OpslineError> {
    init_tracing(&config.service.log_level);

    info!(service = config.service.name.as_str(), "starting opsline serve");

    if config.auth.signing_secret.is_none() {
        warn!("auth.signing_secret is not set -- authenticated routes will reject all tokens");
    }

    // A missing api_key leaves the guard unconfigured: chat degrades to
    // escalation instead of failing at startup.
    let provider: Option<Arc<dyn CompletionProvider>> = match config.completion.api_key.as_deref() {
        Some(api_key) => {
            let client = CompletionClient::new(
                api_key,
                &config.completion.base_url,
                Duration::from_secs(config.completion.timeout_secs),
            )?;
            Some(Arc::new(client))
        }
        None => {
            warn!("completion.api_key is not set -- all chat messages will escalate");
            None
        }
    };

    let guard = Arc::new(CompletionGuard::new(
        provider.is_some(),
        config.completion.enabled_by_default,
    ));
    let router = InteractionRouter::new(guard.clone(), provider);

    let limiter = AdmissionLimiter::new(AdmissionLimits {
        chat: limit_spec(&config.limits.chat),
        auth: limit_spec(&config.limits.auth),
        agent: limit_spec(&config.limits.agent),
    });

    let identity = IdentityGate::new(
        config.auth.signing_secret.clone(),
        Duration::from_secs(config.auth.token_ttl_minutes * 60),
    );

    let state = GatewayState::new(
        identity,
        limiter,
        guard,
        router,
        config.auth.bootstrap_secret.clone(),
    );

    let server = start_server(state, &config.server.host, config.server.port);
    tokio::select! {
        result = server => result,
        _ = shutdown_signal() => {
            info!("shutdown signal received -- stopping");
            Ok(())
        }
    }
}

fn limit_spec(class: &opsline_config::model::LimitClassConfig) -> LimitSpec {
    LimitSpec {
        max_requests: class.max_requests,
        window: Duration::from_millis(class.window_ms),
    }
}

async fn shutdown_signal() {
    // SIGTERM matters for container deployments; ctrl-c for local runs.
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("opsline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
