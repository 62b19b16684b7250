// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Opsline triage engine.
//!
//! Request flow: identity gate, then admission limiter, then the handler.
//! Auth and rate-limit failures surface as error statuses; completion
//! failures never do.

pub mod auth;
pub mod handlers;
pub mod ratelimit;
pub mod server;

pub use auth::IdentityGate;
pub use ratelimit::{AdmissionLimiter, AdmissionLimits, LimitClass, LimitSpec};
pub use server::{GatewayState, build_router, start_server};
