// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The admission limiter: per-key rolling-window request counters.
//!
//! One live window per (class, key). Rejection is a normal control-flow
//! branch carrying a retry-after hint; it never blocks, queues, or
//! escalates to a fatal error. Counters are in-memory only and reset on
//! process restart.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use opsline_core::OpslineError;

/// Traffic class with an independently configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitClass {
    /// Conversational messages: high volume, short window.
    Chat,
    /// Authentication attempts: low volume, longer window. Metered only on
    /// state-changing calls.
    Auth,
    /// Machine/agent calls: higher volume ceiling.
    Agent,
}

impl std::fmt::Display for LimitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitClass::Chat => write!(f, "chat"),
            LimitClass::Auth => write!(f, "auth"),
            LimitClass::Agent => write!(f, "agent"),
        }
    }
}

/// A single admission limit: at most `max_requests` per rolling `window`.
///
/// Mirrors the `limits.*` config sections to avoid a dependency on the
/// config crate from the gateway crate.
#[derive(Debug, Clone, Copy)]
pub struct LimitSpec {
    pub max_requests: u32,
    pub window: Duration,
}

/// Limits for the three traffic classes.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionLimits {
    pub chat: LimitSpec,
    pub auth: LimitSpec,
    pub agent: LimitSpec,
}

impl AdmissionLimits {
    fn spec(&self, class: LimitClass) -> LimitSpec {
        match class {
            LimitClass::Chat => self.chat,
            LimitClass::Auth => self.auth,
            LimitClass::Agent => self.agent,
        }
    }
}

#[derive(Debug)]
struct Window {
    count: u32,
    started: Instant,
}

/// Per-identity/per-class request counter.
///
/// Safe under concurrent access: each window's updates are serialized by the
/// map's internal sharding, and no lock is held across await points.
#[derive(Debug)]
pub struct AdmissionLimiter {
    limits: AdmissionLimits,
    windows: DashMap<String, Window>,
}

impl AdmissionLimiter {
    pub fn new(limits: AdmissionLimits) -> Self {
        Self {
            limits,
            windows: DashMap::new(),
        }
    }

    /// Admit or reject one request for `key` under `class`.
    ///
    /// Returns `Err(RateLimited)` with the remaining window time once the
    /// count exceeds the class limit. The caller must reject the request
    /// immediately; the limiter itself never blocks.
    pub fn admit(&self, class: LimitClass, key: &str) -> Result<(), OpslineError> {
        self.admit_at(class, key, Instant::now())
    }

    /// Clock-injected variant of [`AdmissionLimiter::admit`] for
    /// deterministic tests.
    pub fn admit_at(&self, class: LimitClass, key: &str, now: Instant) -> Result<(), OpslineError> {
        let spec = self.limits.spec(class);
        let map_key = format!("{class}:{key}");

        let mut window = self.windows.entry(map_key).or_insert_with(|| Window {
            count: 0,
            started: now,
        });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= spec.window {
            window.count = 0;
            window.started = now;
        }

        window.count += 1;
        if window.count > spec.max_requests {
            let retry_after = spec.window.saturating_sub(now.saturating_duration_since(window.started));
            tracing::debug!(class = %class, key, retry_after_ms = retry_after.as_millis() as u64, "admission rejected");
            return Err(OpslineError::RateLimited { retry_after });
        }

        Ok(())
    }
}
