// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation decision and hybrid response routing.
//!
//! The escalation decider gates automated handling; the interaction router
//! orchestrates the guarded completion call and converts every failure mode
//! into a human hand-off.

pub mod escalation;
pub mod router;

pub use escalation::{ReviewPriority, Sentiment, human_review_priority, must_escalate, sentiment};
pub use router::InteractionRouter;
