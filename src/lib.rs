// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Formgate
//!
//! Admission gate for form-submission endpoints: a per-identifier
//! fixed-window rate limiter composed with a honeypot/heuristic bot detector,
//! sitting in front of the contact form, chatbot, newsletter, login, and
//! generic API routes of a marketing site's back office.
//!
//! - Five named rate-limit policies with independent in-memory stores
//! - Layered bot signals: honeypot fields, submission speed, user-agent
//!   signatures, missing browser headers
//! - Honest 429 for rate-limited clients; decoy success for detected bots
//! - `X-RateLimit-*` headers on every gated response

pub mod config;
pub mod detector;
pub mod handlers;
pub mod limiter;
pub mod metrics;

pub use config::{Config, DetectionConfig, PolicyTable, RateLimitPolicy};
pub use detector::{BotDetector, BotSignal};
pub use limiter::{Decision, Gate, PolicyKind, RateLimiter};
