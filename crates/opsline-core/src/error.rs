// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Opsline triage engine.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Opsline crates.
///
/// Only `Auth`, `Forbidden`, `RateLimited`, and `Validation` are allowed to
/// cross the HTTP boundary as error responses. Provider and timeout failures
/// are recovered inside the interaction router and converted into an
/// escalation signal before any response is written.
#[derive(Debug, Error)]
pub enum OpslineError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Bearer credential missing, malformed, tampered, or expired. Maps to 401.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Authenticated identity lacks the required role claim. Maps to 403.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Admission window exhausted for the caller. Maps to 429 with Retry-After.
    #[error("rate limit exceeded, retry after {retry_after:?}")]
    RateLimited {
        /// Remaining time in the current admission window.
        retry_after: Duration,
    },

    /// Malformed or missing required request fields. Maps to 400.
    #[error("validation error: {0}")]
    Validation(String),

    /// Completion service errors (transport failure, non-2xx status, bad payload).
    /// Raised only inside a guarded call; never surfaced to the end user.
    #[error("completion provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion call exceeded its deadline. Treated like a provider failure.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OpslineError {
    /// Convenience constructor for provider errors without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
