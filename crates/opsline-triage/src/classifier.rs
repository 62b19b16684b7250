// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic ticket classification.
//!
//! Maps (subject, description) to category, priority, and tags using ordered
//! keyword tiers. Zero-cost heuristic rules: no model call, no network, no
//! latency. The function is pure and total: unknown input falls back to
//! `General` / `Low` rather than failing.

use serde::{Deserialize, Serialize};

use opsline_core::types::{Category, Priority};

/// Result of classifying a support request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
    /// De-duplicated, insertion-ordered tags: category slug, priority-derived
    /// markers, and feature tags.
    pub tags: Vec<String>,
    /// Heuristic confidence in [0, 1]. The field and its range are part of
    /// the contract so a learned scorer can replace the keyword rules without
    /// changing callers.
    pub confidence: f32,
}

/// Category keyword tiers in fixed match order; first match wins.
const CATEGORY_TIERS: &[(Category, &[&str])] = &[
    (
        Category::Authentication,
        &[
            "password", "login", "log in", "sign in", "2fa", "mfa", "locked out",
            "authentication", "sso",
        ],
    ),
    (
        Category::SystemError,
        &["error", "crash", "exception", "bug", "broken", "failure", "not working"],
    ),
    (
        Category::Performance,
        &["slow", "lag", "performance", "timeout", "latency", "freezing", "hanging"],
    ),
    (
        Category::Security,
        &["hacked", "breach", "virus", "malware", "phishing", "ransomware", "suspicious"],
    ),
    (
        Category::Connectivity,
        &["vpn", "network", "wifi", "internet", "connection", "offline", "outage", "dns"],
    ),
    (
        Category::Billing,
        &["invoice", "billing", "payment", "charge", "subscription", "refund", "pricing"],
    ),
];

/// Priority keyword tiers, most severe first; first match wins.
const CRITICAL_KEYWORDS: &[&str] = &["critical", "emergency", "urgent", "down"];
const HIGH_KEYWORDS: &[&str] = &["important", "asap", "high", "severe"];
const MEDIUM_KEYWORDS: &[&str] = &["medium", "normal"];

/// Domain keywords that trigger feature tags. The keyword is the tag.
const FEATURE_TAGS: &[&str] = &["api", "database", "email", "integration", "payment", "shipping"];

/// Classify a support request from its subject and description.
///
/// Deterministic, pure, and total: identical input always yields identical
/// output, and no input fails. Empty or unrecognized text maps to
/// `General` / `Low`.
pub fn classify(subject: &str, description: &str) -> Classification {
    let text = format!("{subject} {description}").to_lowercase();

    let category = match_category(&text);
    let (priority, priority_matched) = match_priority(&text);

    let mut tags: Vec<String> = Vec::new();
    push_unique(&mut tags, category.slug());
    match priority {
        Priority::Critical => push_unique(&mut tags, "urgent"),
        Priority::High => push_unique(&mut tags, "important"),
        Priority::Medium | Priority::Low => {}
    }
    for feature in FEATURE_TAGS {
        if text.contains(feature) {
            push_unique(&mut tags, feature);
        }
    }

    // Heuristic scalar: signal count scaled into [0, 1]. A learned scorer
    // slots in here without touching the shape of the result.
    let mut confidence: f32 = 0.5;
    if category != Category::General {
        confidence += 0.2;
    }
    if priority_matched {
        confidence += 0.2;
    }

    Classification {
        category,
        priority,
        tags,
        confidence: confidence.min(1.0),
    }
}

fn match_category(text: &str) -> Category {
    for (category, keywords) in CATEGORY_TIERS {
        if keywords.iter().any(|k| text.contains(k)) {
            return *category;
        }
    }
    Category::General
}

/// Returns the matched priority and whether a keyword tier matched at all
/// (`Low` is the no-match default, not a signal).
fn match_priority(text: &str) -> (Priority, bool) {
    if CRITICAL_KEYWORDS.iter().any(|k| text.contains(k)) {
        (Priority::Critical, true)
    } else if HIGH_KEYWORDS.iter().any(|k| text.contains(k)) {
        (Priority::High, true)
    } else if MEDIUM_KEYWORDS.iter().any(|k| text.contains(k)) {
        (Priority::Medium, true)
    } else {
        (Priority::Low, false)
    }
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_defaults_to_general_low() {
        let c = classify("", "");
        assert_eq!(c.category, Category::General);
        assert_eq!(c.priority, Priority::Low);
        assert_eq!(c.tags, vec!["general".to_string()]);
        assert!((0.0..=1.0).contains(&c.confidence));
    }

    #[test]
    fn urgent_server_down_is_critical() {
        let c = classify("URGENT: server down", "production outage");
        assert_eq!(c.priority, Priority::Critical);
        assert!(c.tags.contains(&"urgent".to_string()));
    }

    #[test]
    fn category_order_is_first_match_wins() {
        // "password" (Authentication) beats "error" (System Error) because
        // Authentication is the earlier tier.
        let c = classify("password error", "");
        assert_eq!(c.category, Category::Authentication);

        let c = classify("application error", "throws an exception on save");
        assert_eq!(c.category, Category::SystemError);
    }

    #[test]
    fn priority_tiers_are_ordered_most_severe_first() {
        assert_eq!(classify("critical and important", "").priority, Priority::Critical);
        assert_eq!(classify("important request", "").priority, Priority::High);
        assert_eq!(classify("normal question", "").priority, Priority::Medium);
        assert_eq!(classify("just wondering", "").priority, Priority::Low);
    }

    #[test]
    fn high_priority_gets_important_tag() {
        let c = classify("severe billing problem", "");
        assert_eq!(c.priority, Priority::High);
        assert!(c.tags.contains(&"important".to_string()));
        assert!(!c.tags.contains(&"urgent".to_string()));
    }

    #[test]
    fn feature_tags_from_domain_keywords() {
        let c = classify("api timeout", "the database integration is slow");
        assert!(c.tags.contains(&"api".to_string()));
        assert!(c.tags.contains(&"database".to_string()));
        assert!(c.tags.contains(&"integration".to_string()));
    }

    #[test]
    fn tags_are_deduplicated() {
        // "payment" is both the Billing category trigger and a feature tag.
        let c = classify("payment failed", "payment payment payment");
        let payment_count = c.tags.iter().filter(|t| *t == "payment").count();
        assert_eq!(payment_count, 1);
        let billing_count = c.tags.iter().filter(|t| *t == "billing").count();
        assert_eq!(billing_count, 1);
    }

    #[test]
    fn classify_is_idempotent() {
        let first = classify("VPN keeps dropping", "remote workers cannot connect");
        let second = classify("VPN keeps dropping", "remote workers cannot connect");
        assert_eq!(first, second);
    }

    #[test]
    fn subject_and_description_are_both_scanned() {
        let from_subject = classify("refund please", "");
        let from_description = classify("", "refund please");
        assert_eq!(from_subject.category, Category::Billing);
        assert_eq!(from_description.category, Category::Billing);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = classify("EMERGENCY: WIFI OUTAGE", "");
        assert_eq!(c.priority, Priority::Critical);
        assert_eq!(c.category, Category::Connectivity);
    }

    #[test]
    fn confidence_stays_in_range() {
        for (subject, description) in [
            ("", ""),
            ("urgent api crash", "database down, emergency"),
            ("hello", "just saying hi"),
        ] {
            let c = classify(subject, description);
            assert!((0.0..=1.0).contains(&c.confidence), "confidence out of range");
        }
    }
}
