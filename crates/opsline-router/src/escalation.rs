// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation decision and human-review ordering.
//!
//! [`must_escalate`] is the circuit that prevents automated handling of
//! complaints, long technical reports, and anything explicitly demanding a
//! person. It is cheap, synchronous, and runs before any external call.
//! It evaluates raw message text and is fully independent of the ticket
//! classifier in opsline-triage.

use serde::{Deserialize, Serialize};
use strum::Display;

use opsline_core::types::{ConversationContext, ResponseMode};

/// Keywords that force a hand-off to a person.
///
/// Note: "urgent" and "critical" also appear in the priority tiers of the
/// ticket classifier. The overlap is intentional; such a message both
/// escalates and classifies as critical.
const ESCALATION_KEYWORDS: &[&str] = &[
    "urgent",
    "emergency",
    "human",
    "manager",
    "supervisor",
    "complaint",
    "unhappy",
    "frustrated",
    "refund",
    "billing issue",
    "critical",
];

/// Error patterns that indicate a technical report too risky to automate.
const ERROR_PATTERNS: &[&str] = &["error", "crash", "exception"];

/// Messages longer than this are always routed to a person.
const MAX_AUTOMATED_LENGTH: usize = 500;

/// Decide whether a message must go to a human responder.
///
/// True when ANY of: the conversation is already in human mode; the message
/// contains an escalation keyword; the message exceeds the length threshold;
/// the message contains an error pattern.
pub fn must_escalate(message: &str, context: &ConversationContext) -> bool {
    if context.mode == ResponseMode::Human {
        return true;
    }

    if message.len() > MAX_AUTOMATED_LENGTH {
        return true;
    }

    let lower = message.to_lowercase();
    ESCALATION_KEYWORDS.iter().any(|k| lower.contains(k))
        || ERROR_PATTERNS.iter().any(|k| lower.contains(k))
}

/// Coarse message sentiment from disjoint keyword counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

const POSITIVE_KEYWORDS: &[&str] = &[
    "thanks",
    "thank you",
    "great",
    "awesome",
    "perfect",
    "excellent",
    "appreciate",
    "happy",
    "wonderful",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "angry",
    "terrible",
    "awful",
    "horrible",
    "useless",
    "hate",
    "worst",
    "disappointed",
    "annoyed",
    "unacceptable",
];

/// Classify sentiment by comparing positive vs negative keyword counts.
/// Ties resolve to `Neutral`.
pub fn sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = POSITIVE_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    let negative = NEGATIVE_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Queue position for messages awaiting a human responder.
///
/// Orders human queues only; it never gates automated handling — that is
/// [`must_escalate`]'s sole responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewPriority {
    Low,
    Medium,
    High,
}

/// Threshold above which an unremarkable message still warrants a closer look.
const MEDIUM_REVIEW_LENGTH: usize = 300;

/// Order a message in the human review queue.
pub fn human_review_priority(
    message: &str,
    message_sentiment: Sentiment,
    context: &ConversationContext,
) -> ReviewPriority {
    if message_sentiment == Sentiment::Negative || must_escalate(message, context) {
        ReviewPriority::High
    } else if message.len() > MEDIUM_REVIEW_LENGTH {
        ReviewPriority::Medium
    } else {
        ReviewPriority::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ConversationContext {
        ConversationContext::new("client-1")
    }

    #[test]
    fn refund_requests_escalate() {
        assert!(must_escalate("I want a refund", &ctx()));
    }

    #[test]
    fn plain_questions_do_not_escalate() {
        assert!(!must_escalate("how do I reset my password", &ctx()));
    }

    #[test]
    fn explicit_demand_for_a_person_escalates() {
        assert!(must_escalate("let me speak to a human", &ctx()));
        assert!(must_escalate("get me your manager", &ctx()));
    }

    #[test]
    fn error_patterns_escalate() {
        assert!(must_escalate("the app shows an error on launch", &ctx()));
        assert!(must_escalate("it keeps throwing an exception", &ctx()));
    }

    #[test]
    fn long_messages_escalate() {
        let long = "a".repeat(501);
        assert!(must_escalate(&long, &ctx()));
        let not_quite = "a".repeat(500);
        assert!(!must_escalate(&not_quite, &ctx()));
    }

    #[test]
    fn human_mode_conversations_stay_escalated() {
        let mut context = ctx();
        context.mode = ResponseMode::Human;
        assert!(must_escalate("how do I reset my password", &context));
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert!(must_escalate("URGENT!!", &ctx()));
        assert!(must_escalate("This is a COMPLAINT", &ctx()));
    }

    #[test]
    fn sentiment_counts_disjoint_keyword_sets() {
        assert_eq!(sentiment("thanks, this is great"), Sentiment::Positive);
        assert_eq!(sentiment("this is terrible and useless"), Sentiment::Negative);
        assert_eq!(sentiment("can you check the invoice"), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_ties_resolve_to_neutral() {
        assert_eq!(sentiment("great service but awful response time"), Sentiment::Neutral);
    }

    #[test]
    fn negative_sentiment_orders_high() {
        let p = human_review_priority("this is awful", Sentiment::Negative, &ctx());
        assert_eq!(p, ReviewPriority::High);
    }

    #[test]
    fn escalating_message_orders_high_even_when_neutral() {
        let p = human_review_priority("I want a refund", Sentiment::Neutral, &ctx());
        assert_eq!(p, ReviewPriority::High);
    }

    #[test]
    fn long_but_calm_messages_order_medium() {
        let long = "b".repeat(301);
        let p = human_review_priority(&long, Sentiment::Neutral, &ctx());
        assert_eq!(p, ReviewPriority::Medium);
    }

    #[test]
    fn short_calm_messages_order_low() {
        let p = human_review_priority("quick question about my plan", Sentiment::Neutral, &ctx());
        assert_eq!(p, ReviewPriority::Low);
    }
}
