// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The identity gate: HMAC-signed bearer tokens and auth middleware.
//!
//! Tokens are compact two-part strings:
//! `base64url(claims json) . base64url(hmac-sha256 tag)`, signed with the
//! configured secret. Verification is stateless; there is no server-side
//! session store. When no signing secret is configured, all authenticated
//! routes are rejected (fail-closed).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

use opsline_core::{Identity, OpslineError, types::Role};

use crate::handlers::ApiError;
use crate::server::GatewayState;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried inside a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    user_id: String,
    email: String,
    role: Role,
    /// Expiry as unix seconds.
    exp: i64,
}

/// Verifies and issues bearer tokens.
#[derive(Clone)]
pub struct IdentityGate {
    signing_secret: Option<String>,
    token_ttl: Duration,
}

impl std::fmt::Debug for IdentityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityGate")
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl IdentityGate {
    /// Create a gate. `signing_secret = None` makes every verification fail.
    pub fn new(signing_secret: Option<String>, token_ttl: Duration) -> Self {
        Self {
            signing_secret,
            token_ttl,
        }
    }

    /// Issue a signed token for the given identity, valid for the gate's TTL.
    pub fn issue(&self, identity: &Identity) -> Result<String, OpslineError> {
        let secret = self
            .signing_secret
            .as_ref()
            .ok_or_else(|| OpslineError::Config("auth.signing_secret is not set".into()))?;

        let claims = TokenClaims {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            role: identity.role,
            exp: (chrono::Utc::now() + chrono::Duration::from_std(self.token_ttl).unwrap_or_default())
                .timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| OpslineError::Internal(format!("claims serialization: {e}")))?;
        let encoded = URL_SAFE_NO_PAD.encode(&payload);

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| OpslineError::Internal(format!("hmac key: {e}")))?;
        mac.update(encoded.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{encoded}.{tag}"))
    }

    /// Verify a bearer token and return the identity it carries.
    ///
    /// Rejects missing secrets, malformed tokens, bad signatures (checked in
    /// constant time via `Mac::verify_slice`), and expired claims. No retry,
    /// no fallback.
    pub fn authenticate(&self, token: &str) -> Result<Identity, OpslineError> {
        let Some(secret) = self.signing_secret.as_ref() else {
            tracing::error!("no signing secret configured -- rejecting request");
            return Err(OpslineError::Auth("authentication unavailable".into()));
        };

        let (encoded, tag) = token
            .split_once('.')
            .ok_or_else(|| OpslineError::Auth("malformed token".into()))?;

        let tag_bytes = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| OpslineError::Auth("malformed token signature".into()))?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| OpslineError::Internal(format!("hmac key: {e}")))?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&tag_bytes)
            .map_err(|_| OpslineError::Auth("invalid token signature".into()))?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| OpslineError::Auth("malformed token payload".into()))?;
        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|_| OpslineError::Auth("malformed token claims".into()))?;

        if claims.exp <= chrono::Utc::now().timestamp() {
            return Err(OpslineError::Auth("token expired".into()));
        }

        Ok(Identity {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Identity attached by the optional-auth middleware.
///
/// Routes with mixed public/authenticated access read this instead of
/// requiring [`Identity`] directly.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Middleware that requires a valid bearer token.
///
/// On success the verified [`Identity`] is attached as a request extension;
/// on failure the request is rejected with 401.
pub async fn require_auth(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        bearer_token(&request).ok_or_else(|| OpslineError::Auth("missing bearer token".into()))?;
    let identity = state.identity.authenticate(token)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Middleware that authenticates when a token is present but never rejects.
///
/// Attaches [`MaybeIdentity`] so handlers can key rate limits on the caller
/// when known. An invalid token is treated as absent, not as an error.
pub async fn attach_identity(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = bearer_token(&request).and_then(|t| state.identity.authenticate(t).ok());
    request.extensions_mut().insert(MaybeIdentity(identity));
    next.run(request).await
}
