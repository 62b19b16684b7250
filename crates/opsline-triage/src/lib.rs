// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket triage: heuristic classification and SLA deadlines.
//!
//! Everything in this crate is pure, synchronous, and total. The keyword
//! rules are a deliberate placeholder for a future learned scorer; the
//! [`classifier::Classification`] shape (including `confidence`) is the
//! stable contract callers depend on.

pub mod classifier;
pub mod sla;
pub mod ticket;

pub use classifier::{Classification, classify};
pub use sla::{sla_minutes, sla_minutes_for_label};
pub use ticket::{open_ticket, reclassify};
