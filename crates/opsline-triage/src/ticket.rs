// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket construction and explicit re-classification.
//!
//! Category, priority, and tags are assigned exactly once at creation. They
//! are never silently re-derived; [`reclassify`] is the explicit, auditable
//! path for changing them, and it logs the transition.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use opsline_core::types::{Ticket, TicketStatus};

use crate::classifier::classify;
use crate::sla::sla_minutes;

/// Open a new ticket, classifying it and deriving its SLA deadline.
///
/// Upholds the invariant `sla_deadline_minutes == sla_minutes(priority)`.
pub fn open_ticket(subject: impl Into<String>, description: impl Into<String>) -> Ticket {
    let subject = subject.into();
    let description = description.into();
    let classification = classify(&subject, &description);

    Ticket {
        id: Uuid::new_v4(),
        subject,
        description,
        category: classification.category,
        priority: classification.priority,
        tags: classification.tags,
        sla_deadline_minutes: sla_minutes(classification.priority),
        status: TicketStatus::Open,
        created_at: Utc::now(),
    }
}

/// Re-run classification for an existing ticket and apply the result.
///
/// This is an explicit action, logged for audit; nothing in the system calls
/// it implicitly. The SLA deadline is re-derived alongside the priority so
/// the two never diverge.
pub fn reclassify(ticket: &mut Ticket) {
    let previous_category = ticket.category;
    let previous_priority = ticket.priority;

    let classification = classify(&ticket.subject, &ticket.description);
    ticket.category = classification.category;
    ticket.priority = classification.priority;
    ticket.tags = classification.tags;
    ticket.sla_deadline_minutes = sla_minutes(classification.priority);

    info!(
        ticket_id = %ticket.id,
        from_category = %previous_category,
        to_category = %ticket.category,
        from_priority = %previous_priority,
        to_priority = %ticket.priority,
        "ticket reclassified"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsline_core::types::{Category, Priority};

    #[test]
    fn open_ticket_derives_sla_from_priority() {
        let ticket = open_ticket("URGENT: mail server down", "nobody can send email");
        assert_eq!(ticket.priority, Priority::Critical);
        assert_eq!(ticket.sla_deadline_minutes, 15);
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[test]
    fn open_ticket_defaults_for_vague_input() {
        let ticket = open_ticket("question", "how does the portal work?");
        assert_eq!(ticket.category, Category::General);
        assert_eq!(ticket.priority, Priority::Low);
        assert_eq!(ticket.sla_deadline_minutes, 1440);
    }

    #[test]
    fn reclassify_keeps_sla_in_lockstep_with_priority() {
        let mut ticket = open_ticket("question", "how does the portal work?");
        assert_eq!(ticket.sla_deadline_minutes, 1440);

        // Edited description now carries a critical signal.
        ticket.description = "the whole site is down".to_string();
        reclassify(&mut ticket);
        assert_eq!(ticket.priority, Priority::Critical);
        assert_eq!(ticket.sla_deadline_minutes, 15);
    }
}
