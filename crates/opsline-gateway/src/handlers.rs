// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Only auth, rate-limit, and validation failures cross this boundary as
//! error statuses. Completion-service failures never do; they surface as an
//! `escalated` response produced by the interaction router.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use opsline_core::types::{ChatResponse, Identity, Role, Tone};
use opsline_core::{ConversationContext, OpslineError};
use opsline_guard::GuardStatus;
use opsline_router::{ReviewPriority, human_review_priority, sentiment};
use opsline_triage::{classify, sla_minutes};

use crate::auth::MaybeIdentity;
use crate::ratelimit::LimitClass;
use crate::server::GatewayState;

/// Error envelope returned for all error statuses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Boundary wrapper mapping [`OpslineError`] onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(pub OpslineError);

impl From<OpslineError> for ApiError {
    fn from(err: OpslineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            OpslineError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            OpslineError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            OpslineError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            OpslineError::RateLimited { retry_after } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorResponse {
                        error: "rate limit exceeded".to_string(),
                    }),
                )
                    .into_response();
                // Round the hint up so clients never retry inside the window.
                let mut secs = retry_after.as_secs();
                if retry_after.subsec_nanos() > 0 {
                    secs += 1;
                }
                if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                    response.headers_mut().insert("retry-after", value);
                }
                return response;
            }
            other => {
                tracing::error!(error = %other, "request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Request body for POST /v1/tickets/classify.
///
/// Fields default to empty: the classifier is total, so a missing subject or
/// description is classified, not rejected.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

/// Response body for POST /v1/tickets/classify.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub category: opsline_core::types::Category,
    pub priority: opsline_core::types::Priority,
    pub tags: Vec<String>,
    pub sla_minutes: u32,
    pub confidence: f32,
}

/// POST /v1/tickets/classify
///
/// Always 200 on well-formed input. Metered under the agent class, keyed by
/// the caller when a valid token accompanies the request.
pub async fn post_classify(
    State(state): State<GatewayState>,
    Extension(MaybeIdentity(identity)): Extension<MaybeIdentity>,
    Json(body): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let key = identity
        .as_ref()
        .map(|i| i.user_id.as_str())
        .unwrap_or("public");
    state.limiter.admit(LimitClass::Agent, key)?;

    let classification = classify(&body.subject, &body.description);
    Ok(Json(ClassifyResponse {
        sla_minutes: sla_minutes(classification.priority),
        category: classification.category,
        priority: classification.priority,
        tags: classification.tags,
        confidence: classification.confidence,
    }))
}

/// Request body for POST /v1/chat/message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
    #[serde(default)]
    pub tone: Option<Tone>,
}

/// Response body when a message is routed to a human instead of answered.
#[derive(Debug, Serialize)]
pub struct EscalatedResponse {
    pub escalated: bool,
    pub review_priority: ReviewPriority,
}

/// Either an automated reply or the escalation signal.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatReply {
    Answered(ChatResponse),
    Escalated(EscalatedResponse),
}

/// POST /v1/chat/message
///
/// Requires a bearer token. Appends the message to the conversation in
/// arrival order, routes it, and returns either the AI response or an
/// escalation signal with a human-review priority. The completion service
/// failing or being disabled is indistinguishable from a deliberate
/// escalation in the response shape.
pub async fn post_chat_message(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    state.limiter.admit(LimitClass::Chat, &identity.user_id)?;

    let message = body.message.trim();
    if message.is_empty() {
        return Err(OpslineError::Validation("message must not be empty".into()).into());
    }
    if body.conversation_id.trim().is_empty() {
        return Err(OpslineError::Validation("conversation_id must not be empty".into()).into());
    }

    // Snapshot the context before appending so the routed history does not
    // duplicate the current message; the user turn is still recorded at
    // arrival time. The map guard is dropped before any await.
    let snapshot = {
        let mut context = state
            .conversations
            .entry(body.conversation_id.clone())
            .or_insert_with(|| ConversationContext::new(identity.user_id.clone()));
        if let Some(tone) = body.tone {
            context.tone = tone;
        }
        let snapshot = context.clone();
        context.push_user(message);
        snapshot
    };

    match state.router.route(message, &snapshot).await {
        Some(response) => {
            if let Some(mut context) = state.conversations.get_mut(&body.conversation_id) {
                context.push_assistant(&response.content);
            }
            Ok(Json(ChatReply::Answered(response)))
        }
        None => {
            // Once a conversation escalates it stays with a person.
            if let Some(mut context) = state.conversations.get_mut(&body.conversation_id) {
                context.mode = opsline_core::types::ResponseMode::Human;
            }
            let review_priority = human_review_priority(message, sentiment(message), &snapshot);
            Ok(Json(ChatReply::Escalated(EscalatedResponse {
                escalated: true,
                review_priority,
            })))
        }
    }
}

/// Request body for POST /v1/admin/ai-guard.
#[derive(Debug, Deserialize)]
pub struct GuardControlRequest {
    pub enabled: bool,
}

fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.role != Role::Admin {
        return Err(OpslineError::Forbidden("admin role required".into()).into());
    }
    Ok(())
}

/// GET /v1/admin/ai-guard
pub async fn get_guard_status(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<GuardStatus>, ApiError> {
    require_admin(&identity)?;
    Ok(Json(state.guard.status()))
}

/// POST /v1/admin/ai-guard
pub async fn post_guard_control(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<GuardControlRequest>,
) -> Result<Json<GuardStatus>, ApiError> {
    require_admin(&identity)?;
    if body.enabled {
        state.guard.enable();
    } else {
        state.guard.disable();
    }
    tracing::info!(
        admin = identity.email.as_str(),
        enabled = body.enabled,
        "ai guard state changed"
    );
    Ok(Json(state.guard.status()))
}

/// Request body for POST /v1/auth/token.
#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    pub secret: String,
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

/// Response body for POST /v1/auth/token.
#[derive(Debug, Serialize)]
pub struct IssueTokenResponse {
    pub token: String,
}

/// POST /v1/auth/token
///
/// Mints a bearer token for callers holding the bootstrap secret. This is a
/// state-changing authentication call, so it is metered under the auth
/// class, keyed by the requested email.
pub async fn post_issue_token(
    State(state): State<GatewayState>,
    Json(body): Json<IssueTokenRequest>,
) -> Result<Json<IssueTokenResponse>, ApiError> {
    state.limiter.admit(LimitClass::Auth, &body.email)?;

    let Some(expected) = state.bootstrap_secret.as_deref() else {
        return Err(OpslineError::Auth("token issuing is disabled".into()).into());
    };
    if body.secret != expected {
        return Err(OpslineError::Auth("invalid bootstrap secret".into()).into());
    }

    let token = state.identity.issue(&Identity {
        user_id: body.user_id,
        email: body.email,
        role: body.role,
    })?;
    Ok(Json(IssueTokenResponse { token }))
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health
///
/// Public, unauthenticated liveness endpoint.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
