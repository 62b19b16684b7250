// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid response routing.
//!
//! The router decides, per message, between an automated reply and a human
//! hand-off. `None` is the explicit "escalate to human" signal and is never
//! rendered to the end user as content. A disabled guard and a failing
//! completion service produce the same outcome; callers cannot and must not
//! distinguish them.

use std::sync::Arc;

use tracing::{debug, warn};

use opsline_core::provider::{CompletionProvider, CompletionRequest};
use opsline_core::types::{ChatResponse, ConversationContext, Tone};
use opsline_guard::CompletionGuard;

use crate::escalation::must_escalate;

/// Number of recent conversation turns handed to the completion service.
const HISTORY_WINDOW: usize = 5;

/// Routes support messages to the completion service or to a person.
pub struct InteractionRouter {
    guard: Arc<CompletionGuard>,
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl InteractionRouter {
    /// Create a router. `provider` is `None` when no completion service is
    /// configured; every non-escalated message then falls through to a
    /// human, matching the guard's unconfigured state.
    pub fn new(guard: Arc<CompletionGuard>, provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { guard, provider }
    }

    /// Route one message.
    ///
    /// Returns `Some(ChatResponse)` for an automated reply, `None` to
    /// escalate. The escalation decider runs first; only messages it clears
    /// reach the guarded completion call. Guard-disabled and provider-error
    /// outcomes both collapse into `None`.
    pub async fn route(
        &self,
        message: &str,
        context: &ConversationContext,
    ) -> Option<ChatResponse> {
        if must_escalate(message, context) {
            debug!(client_id = context.client_id.as_str(), "message escalated to human");
            return None;
        }

        let Some(provider) = self.provider.as_ref() else {
            debug!("no completion provider configured, escalating");
            return None;
        };

        let request = CompletionRequest {
            instruction: tone_instruction(context.tone).to_string(),
            history: context.recent(HISTORY_WINDOW).to_vec(),
            message: message.to_string(),
        };

        match self.guard.guarded(|| provider.complete(&request)).await {
            Ok(Some(completion)) => Some(ChatResponse::ai(
                completion.content,
                context.tone,
                completion.confidence,
                completion.suggested_follow_up,
            )),
            Ok(None) => {
                debug!("completion guard disabled, escalating");
                None
            }
            Err(e) => {
                warn!(error = %e, "completion call failed, escalating");
                None
            }
        }
    }
}

/// Tone-specific instruction prefixed to every completion request.
fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => {
            "Respond in a professional, courteous tone suitable for business clients."
        }
        Tone::Friendly => "Respond in a warm, friendly, and approachable tone.",
        Tone::Technical => {
            "Respond in a precise, technical tone with concrete steps and terminology."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use opsline_core::provider::Completion;
    use opsline_core::types::{ResponseMode, Responder};
    use opsline_core::OpslineError;

    /// Test double that records requests and returns a canned outcome.
    struct MockProvider {
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
        fail: bool,
    }

    impl MockProvider {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, OpslineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if self.fail {
                return Err(OpslineError::provider("mock failure"));
            }
            Ok(Completion {
                content: "Here is how to fix that.".into(),
                confidence: Some(0.8),
                suggested_follow_up: Some("Did that help?".into()),
            })
        }
    }

    fn enabled_guard() -> Arc<CompletionGuard> {
        Arc::new(CompletionGuard::new(true, true))
    }

    #[tokio::test]
    async fn escalating_message_skips_the_provider() {
        let provider = MockProvider::succeeding();
        let router = InteractionRouter::new(enabled_guard(), Some(provider.clone()));

        let response = router
            .route("I want a refund", &ConversationContext::new("c1"))
            .await;
        assert!(response.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn clean_message_gets_an_ai_response() {
        let provider = MockProvider::succeeding();
        let router = InteractionRouter::new(enabled_guard(), Some(provider.clone()));

        let response = router
            .route("how do I reset my password", &ConversationContext::new("c1"))
            .await
            .expect("should produce a response");

        assert_eq!(response.mode, ResponseMode::Ai);
        assert_eq!(response.responded_by, Responder::Ai);
        assert_eq!(response.confidence, Some(0.8));
        assert!(response.suggested_follow_up.is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_guard_escalates_even_clean_messages() {
        let guard = enabled_guard();
        guard.disable();
        let provider = MockProvider::succeeding();
        let router = InteractionRouter::new(guard, Some(provider.clone()));

        let response = router
            .route("how do I reset my password", &ConversationContext::new("c1"))
            .await;
        assert!(response.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_escalates_not_errors() {
        let provider = MockProvider::failing();
        let router = InteractionRouter::new(enabled_guard(), Some(provider.clone()));

        let response = router
            .route("how do I reset my password", &ConversationContext::new("c1"))
            .await;
        assert!(response.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_provider_escalates() {
        let router = InteractionRouter::new(Arc::new(CompletionGuard::new(false, true)), None);
        let response = router
            .route("how do I reset my password", &ConversationContext::new("c1"))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn provider_receives_trimmed_history_and_tone_instruction() {
        let provider = MockProvider::succeeding();
        let router = InteractionRouter::new(enabled_guard(), Some(provider.clone()));

        let mut context = ConversationContext::new("c1");
        context.tone = Tone::Technical;
        for i in 0..9 {
            context.push_user(format!("turn {i}"));
        }

        router.route("how do I rotate my ssh keys", &context).await.unwrap();

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.history.len(), HISTORY_WINDOW);
        assert_eq!(request.history[0].content, "turn 4");
        assert!(request.instruction.contains("technical"));
        assert_eq!(request.message, "how do I rotate my ssh keys");
    }
}
