// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion-provider seam.
//!
//! The concrete wire format, prompt text, and model name used to call the
//! external completion service are an implementation detail of the provider.
//! Everything upstream of this trait sees only [`CompletionRequest`] and
//! [`Completion`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OpslineError;
use crate::types::ChatTurn;

/// A request for an automated reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Tone-specific instruction derived from the conversation context.
    pub instruction: String,
    /// Bounded recent conversation history, oldest first.
    pub history: Vec<ChatTurn>,
    /// The current inbound message.
    pub message: String,
}

/// A reply produced by the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub suggested_follow_up: Option<String>,
}

/// Adapter trait for external completion services.
///
/// Implementations must surface every failure as an error; the completion
/// guard and interaction router decide how failures degrade.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a reply for the given request.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, OpslineError>;
}
