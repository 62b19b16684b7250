// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Opsline workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Ticket priority, ordered most severe first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// Support ticket category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Authentication,
    #[serde(rename = "System Error")]
    SystemError,
    Performance,
    Security,
    Connectivity,
    Billing,
    General,
}

impl Category {
    /// Kebab-case slug used as a ticket tag.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Authentication => "authentication",
            Category::SystemError => "system-error",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::Connectivity => "connectivity",
            Category::Billing => "billing",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Authentication => "Authentication",
            Category::SystemError => "System Error",
            Category::Performance => "Performance",
            Category::Security => "Security",
            Category::Connectivity => "Connectivity",
            Category::Billing => "Billing",
            Category::General => "General",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle state of a support ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    WaitingOnClient,
    Resolved,
    Closed,
}

/// A support ticket.
///
/// Category, priority, and tags are assigned once at creation by the
/// classifier; re-classification is an explicit, auditable action, never a
/// silent re-derivation. `sla_deadline_minutes` is derived from priority and
/// must always equal the SLA table value for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub subject: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub sla_deadline_minutes: u32,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Role of a single conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn in a conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Response tone requested for automated replies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Technical,
}

/// Whether a conversation is being handled automatically or by a person.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Ai,
    Human,
}

/// Who produced a chat response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Responder {
    User,
    Ai,
    Human,
}

/// Bounded, ordered context for one ongoing support interaction.
///
/// History is append-only and ordered by receipt time. Only a bounded recent
/// window is handed to the completion service (see [`ConversationContext::recent`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub client_id: String,
    pub ticket_id: Option<Uuid>,
    pub history: Vec<ChatTurn>,
    pub tone: Tone,
    pub mode: ResponseMode,
}

impl ConversationContext {
    /// Create an empty context for a client.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ticket_id: None,
            history: Vec::new(),
            tone: Tone::default(),
            mode: ResponseMode::default(),
        }
    }

    /// Append a user turn in arrival order.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    /// Append an assistant turn in arrival order.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    /// The last `n` turns, oldest first. Bounds request size on provider calls.
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

/// A generated or human reply to a support message.
///
/// Invariant: `mode == Ai` implies `responded_by == Ai`. Use the constructors
/// rather than building the struct by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message_id: Uuid,
    pub content: String,
    pub mode: ResponseMode,
    pub responded_by: Responder,
    pub tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_follow_up: Option<String>,
}

impl ChatResponse {
    /// Build an automated response. Enforces the mode/responder invariant.
    pub fn ai(
        content: impl Into<String>,
        tone: Tone,
        confidence: Option<f32>,
        suggested_follow_up: Option<String>,
    ) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            content: content.into(),
            mode: ResponseMode::Ai,
            responded_by: Responder::Ai,
            tone,
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
            timestamp: Utc::now(),
            suggested_follow_up,
        }
    }

    /// Build a human-authored response.
    pub fn human(content: impl Into<String>, tone: Tone) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            content: content.into(),
            mode: ResponseMode::Human,
            responded_by: Responder::Human,
            tone,
            confidence: None,
            timestamp: Utc::now(),
            suggested_follow_up: None,
        }
    }
}

/// Role claim carried in an identity token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Agent,
    Admin,
}

/// Authenticated identity attached to a request by the identity gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_round_trips_through_strings() {
        for p in [
            Priority::Critical,
            Priority::High,
            Priority::Medium,
            Priority::Low,
        ] {
            let parsed = Priority::from_str(&p.to_string()).unwrap();
            assert_eq!(p, parsed);
        }
        // Lenient parsing is case-insensitive.
        assert_eq!(Priority::from_str("CRITICAL").unwrap(), Priority::Critical);
    }

    #[test]
    fn category_slug_and_display() {
        assert_eq!(Category::SystemError.slug(), "system-error");
        assert_eq!(Category::SystemError.to_string(), "System Error");
        assert_eq!(Category::General.to_string(), "General");
    }

    #[test]
    fn category_serializes_with_display_names() {
        let json = serde_json::to_string(&Category::SystemError).unwrap();
        assert_eq!(json, "\"System Error\"");
        let json = serde_json::to_string(&Category::General).unwrap();
        assert_eq!(json, "\"General\"");
    }

    #[test]
    fn recent_bounds_history_window() {
        let mut ctx = ConversationContext::new("client-1");
        for i in 0..8 {
            ctx.push_user(format!("message {i}"));
        }
        let recent = ctx.recent(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].content, "message 3");
        assert_eq!(recent[4].content, "message 7");

        // Fewer turns than the window returns everything.
        let ctx = ConversationContext::new("client-2");
        assert!(ctx.recent(5).is_empty());
    }

    #[test]
    fn history_is_appended_in_arrival_order() {
        let mut ctx = ConversationContext::new("client-1");
        ctx.push_user("hello");
        ctx.push_assistant("hi, how can I help?");
        ctx.push_user("my vpn is down");
        assert_eq!(ctx.history.len(), 3);
        assert_eq!(ctx.history[0].role, ChatRole::User);
        assert_eq!(ctx.history[1].role, ChatRole::Assistant);
        assert_eq!(ctx.history[2].content, "my vpn is down");
    }

    #[test]
    fn ai_response_upholds_mode_invariant() {
        let resp = ChatResponse::ai("All set.", Tone::Friendly, Some(0.9), None);
        assert_eq!(resp.mode, ResponseMode::Ai);
        assert_eq!(resp.responded_by, Responder::Ai);
        assert_eq!(resp.confidence, Some(0.9));
    }

    #[test]
    fn ai_response_clamps_confidence() {
        let resp = ChatResponse::ai("ok", Tone::Professional, Some(1.7), None);
        assert_eq!(resp.confidence, Some(1.0));
    }
}
