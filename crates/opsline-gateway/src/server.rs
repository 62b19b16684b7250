// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and server startup.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use dashmap::DashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use opsline_core::{ConversationContext, OpslineError};
use opsline_guard::CompletionGuard;
use opsline_router::InteractionRouter;

use crate::auth::{IdentityGate, attach_identity, require_auth};
use crate::handlers;
use crate::ratelimit::AdmissionLimiter;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct GatewayState {
    pub identity: IdentityGate,
    pub limiter: Arc<AdmissionLimiter>,
    pub guard: Arc<CompletionGuard>,
    pub router: Arc<InteractionRouter>,
    pub conversations: Arc<DashMap<String, ConversationContext>>,
    pub bootstrap_secret: Option<String>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(
        identity: IdentityGate,
        limiter: AdmissionLimiter,
        guard: Arc<CompletionGuard>,
        router: InteractionRouter,
        bootstrap_secret: Option<String>,
    ) -> Self {
        Self {
            identity,
            limiter: Arc::new(limiter),
            guard,
            router: Arc::new(router),
            conversations: Arc::new(DashMap::new()),
            bootstrap_secret,
            started_at: Instant::now(),
        }
    }
}

/// Build the full gateway router.
///
/// Three surfaces: public (`/health`, token issuing), mixed
/// (`/v1/tickets/classify` accepts anonymous callers but keys limits on the
/// identity when present), and authenticated (chat and guard admin behind
/// [`require_auth`]).
pub fn build_router(state: GatewayState) -> Router {
    let authed = Router::new()
        .route("/v1/chat/message", post(handlers::post_chat_message))
        .route(
            "/v1/admin/ai-guard",
            get(handlers::get_guard_status).post(handlers::post_guard_control),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let mixed = Router::new()
        .route("/v1/tickets/classify", post(handlers::post_classify))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            attach_identity,
        ));

    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/auth/token", post(handlers::post_issue_token))
        .merge(authed)
        .merge(mixed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the task is cancelled.
pub async fn start_server(state: GatewayState, host: &str, port: u16) -> Result<(), OpslineError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OpslineError::Config(format!("failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| OpslineError::Internal(format!("server error: {e}")))
}
