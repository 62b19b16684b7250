// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion guard: a single toggle point for every call to the
//! external completion service.
//!
//! The guard is an explicit, injectable service object shared by reference
//! (`Arc<CompletionGuard>`), never a module-level global, so tests can
//! construct independent instances. The flag is atomic; reads are
//! side-effect free.
//!
//! An unconfigured guard (no completion credentials at startup) behaves as
//! permanently disabled: the control operations cannot enable it, and every
//! guarded call short-circuits to "unavailable".

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use opsline_core::OpslineError;

/// Snapshot of the guard's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardStatus {
    pub enabled: bool,
    pub configured: bool,
}

/// Process-wide resilience wrapper around the completion service.
///
/// State lives only in memory: it is initialized from configuration at
/// startup and resets to the configured default on restart.
#[derive(Debug)]
pub struct CompletionGuard {
    enabled: AtomicBool,
    configured: bool,
}

impl CompletionGuard {
    /// Create a guard. `configured == false` forces the guard off regardless
    /// of `enabled_by_default`.
    pub fn new(configured: bool, enabled_by_default: bool) -> Self {
        Self {
            enabled: AtomicBool::new(configured && enabled_by_default),
            configured,
        }
    }

    /// Turn the guard on. No-op (with a warning) when unconfigured.
    pub fn enable(&self) {
        if !self.configured {
            warn!("completion guard is unconfigured; enable request ignored");
            return;
        }
        self.enabled.store(true, Ordering::SeqCst);
        info!("completion guard enabled");
    }

    /// Turn the guard off.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        info!("completion guard disabled");
    }

    /// Flip the guard and return the new state.
    pub fn toggle(&self) -> bool {
        if !self.configured {
            warn!("completion guard is unconfigured; toggle request ignored");
            return false;
        }
        let was_enabled = self.enabled.fetch_xor(true, Ordering::SeqCst);
        let now_enabled = !was_enabled;
        info!(enabled = now_enabled, "completion guard toggled");
        now_enabled
    }

    /// Whether guarded calls currently pass through.
    pub fn is_enabled(&self) -> bool {
        self.configured && self.enabled.load(Ordering::SeqCst)
    }

    /// Side-effect-free state snapshot.
    pub fn status(&self) -> GuardStatus {
        GuardStatus {
            enabled: self.is_enabled(),
            configured: self.configured,
        }
    }

    /// Run `f` behind the guard.
    ///
    /// Returns `Ok(None)` immediately, without invoking `f`, when the guard
    /// is disabled or unconfigured. When enabled, `f` runs and its error is
    /// propagated unchanged: the guard never swallows service failures, that
    /// recovery belongs to the caller.
    pub async fn guarded<T, F, Fut>(&self, f: F) -> Result<Option<T>, OpslineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, OpslineError>>,
    {
        if !self.is_enabled() {
            return Ok(None);
        }
        f().await.map(Some)
    }
}
