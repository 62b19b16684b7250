// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SLA response deadlines derived from ticket priority.
//!
//! The table is fixed and contractual. Deadlines are minutes from ticket
//! creation; they are always derived from the priority, never stored
//! independently of it.

use std::str::FromStr;

use opsline_core::types::Priority;

/// Response deadline in minutes for each priority.
pub fn sla_minutes(priority: Priority) -> u32 {
    match priority {
        Priority::Critical => 15,
        Priority::High => 60,
        Priority::Medium => 240,
        Priority::Low => 1440,
    }
}

/// Lenient lookup for string labels from the HTTP boundary.
///
/// Unknown or missing labels default to the `medium` deadline.
pub fn sla_minutes_for_label(label: &str) -> u32 {
    Priority::from_str(label.trim())
        .map(sla_minutes)
        .unwrap_or_else(|_| sla_minutes(Priority::Medium))
}
