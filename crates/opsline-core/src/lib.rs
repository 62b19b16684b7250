// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Opsline support-triage engine.
//!
//! This crate provides the shared error type, domain types, and the
//! completion-provider trait used throughout the Opsline workspace.

pub mod error;
pub mod provider;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OpslineError;
pub use provider::{Completion, CompletionProvider, CompletionRequest};
pub use types::{
    Category, ChatResponse, ChatRole, ChatTurn, ConversationContext, Identity, Priority,
    Responder, ResponseMode, Role, Ticket, TicketStatus, Tone,
};
