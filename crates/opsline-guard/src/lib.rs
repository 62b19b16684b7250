// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion-service resilience for the Opsline triage engine.
//!
//! [`CompletionGuard`] is the single chokepoint every external completion
//! call passes through; [`CompletionClient`] is the HTTP adapter behind it.
//! A disabled or unconfigured guard degrades to "unavailable" rather than
//! raising, which the interaction router converts into a human handoff.

pub mod client;
pub mod guard;

pub use client::CompletionClient;
pub use guard::{CompletionGuard, GuardStatus};
