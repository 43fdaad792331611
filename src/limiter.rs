// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-window rate limiter for form-submission endpoints.
//!
//! Each named policy (contact form, chatbot, newsletter, generic API, login)
//! backs an independent [`RateLimiter`] with its own entry store. Counting is
//! fixed-window: an identifier's counter resets atomically when its window
//! boundary passes. The known burst-at-boundary weakness (up to twice the
//! limit across a boundary) is accepted for this threat model.
//!
//! Windows are tracked in wall-clock epoch milliseconds rather than
//! monotonic instants because the reset time is surfaced to clients in the
//! `X-RateLimit-Reset` header.

use crate::config::{PolicyTable, RateLimitPolicy};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Request is admitted
    Allowed {
        /// Remaining requests in the current window
        remaining: u32,
        /// When the current window resets, epoch ms
        reset_at_ms: i64,
    },
    /// Request is rejected
    Limited {
        /// Policy rejection message for the client
        message: String,
        /// When the current window resets, epoch ms
        reset_at_ms: i64,
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    /// Remaining requests in the window; zero when limited.
    pub fn remaining(&self) -> u32 {
        match self {
            Decision::Allowed { remaining, .. } => *remaining,
            Decision::Limited { .. } => 0,
        }
    }

    /// Window reset time, epoch ms.
    pub fn reset_at_ms(&self) -> i64 {
        match self {
            Decision::Allowed { reset_at_ms, .. } | Decision::Limited { reset_at_ms, .. } => {
                *reset_at_ms
            }
        }
    }

    /// Window reset time as a wall-clock timestamp.
    pub fn reset_at(&self) -> DateTime<Utc> {
        match Utc.timestamp_millis_opt(self.reset_at_ms()) {
            chrono::LocalResult::Single(t) => t,
            _ => Utc::now(),
        }
    }
}

/// Per-identifier window state.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    /// Requests counted in the current window
    count: u32,
    /// When the window resets, epoch ms
    reset_at_ms: i64,
}

/// Fixed-window rate limiter over an in-memory entry store.
///
/// State is process-local and ephemeral: a restart clears all counters,
/// which is acceptable for a deterrent (slow abuse, not strictly prevent it).
pub struct RateLimiter {
    policy: RateLimitPolicy,
    entries: RwLock<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    /// Create a limiter for the given policy.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The policy this limiter enforces.
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Decide whether a request from `identifier` is admitted.
    ///
    /// A first request, or any request after the identifier's window has
    /// expired, starts a fresh window with `count = 1`. A request at the
    /// limit is rejected without mutating the entry, so rejected attempts
    /// are not themselves counted.
    pub async fn check(&self, identifier: &str) -> Decision {
        self.check_at(identifier, Utc::now().timestamp_millis()).await
    }

    /// [`check`](Self::check) with an explicit current time, epoch ms.
    pub async fn check_at(&self, identifier: &str, now_ms: i64) -> Decision {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get_mut(identifier) {
            if entry.reset_at_ms >= now_ms {
                // Active window, limit reached: reject without touching the
                // entry, so rejected attempts are not themselves counted
                if entry.count >= self.policy.max_requests {
                    let retry_ms = (entry.reset_at_ms - now_ms).max(0) as u64;
                    info!(
                        identifier,
                        count = entry.count,
                        retry_after_ms = retry_ms,
                        "rate limit exceeded"
                    );
                    return Decision::Limited {
                        message: self.policy.message.clone(),
                        reset_at_ms: entry.reset_at_ms,
                        retry_after: Duration::from_millis(retry_ms),
                    };
                }

                entry.count += 1;
                let remaining = self.policy.max_requests - entry.count;
                debug!(identifier, count = entry.count, remaining, "request admitted");
                return Decision::Allowed {
                    remaining,
                    reset_at_ms: entry.reset_at_ms,
                };
            }
        }

        // No entry, or the stored window has expired: start fresh.
        // Stale counts never carry over into the new window.
        let reset_at_ms = now_ms + self.policy.window_ms;
        entries.insert(
            identifier.to_string(),
            WindowEntry {
                count: 1,
                reset_at_ms,
            },
        );
        debug!(identifier, "new window opened");
        Decision::Allowed {
            remaining: self.policy.max_requests.saturating_sub(1),
            reset_at_ms,
        }
    }

    /// Unconditionally delete the identifier's entry (admin unblock, test
    /// isolation).
    pub async fn reset(&self, identifier: &str) {
        let mut entries = self.entries.write().await;
        if entries.remove(identifier).is_some() {
            info!(identifier, "rate limit entry reset");
        }
    }

    /// Delete entries whose window has already expired.
    ///
    /// Housekeeping only: `check` detects and overwrites expired entries on
    /// access, so correctness never depends on the sweep having run. This
    /// bounds memory growth from one-shot identifiers.
    pub async fn sweep(&self) {
        let now_ms = Utc::now().timestamp_millis();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at_ms >= now_ms);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, retained = entries.len(), "swept expired rate limit entries");
        }
    }

    /// Number of tracked identifiers.
    pub async fn tracked(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Which named policy gates a request. Doubles as the metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    ContactForm,
    Chatbot,
    Newsletter,
    Api,
    Login,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContactForm => "contact_form",
            Self::Chatbot => "chatbot",
            Self::Newsletter => "newsletter",
            Self::Api => "api",
            Self::Login => "login",
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All five named limiters, constructed once at startup and injected into the
/// routing layer. The stores are independent; no counters are shared.
pub struct Gate {
    contact_form: RateLimiter,
    chatbot: RateLimiter,
    newsletter: RateLimiter,
    api: RateLimiter,
    login: RateLimiter,
}

impl Gate {
    pub fn new(policies: &PolicyTable) -> Self {
        Self {
            contact_form: RateLimiter::new(policies.contact_form.clone()),
            chatbot: RateLimiter::new(policies.chatbot.clone()),
            newsletter: RateLimiter::new(policies.newsletter.clone()),
            api: RateLimiter::new(policies.api.clone()),
            login: RateLimiter::new(policies.login.clone()),
        }
    }

    pub fn limiter(&self, kind: PolicyKind) -> &RateLimiter {
        match kind {
            PolicyKind::ContactForm => &self.contact_form,
            PolicyKind::Chatbot => &self.chatbot,
            PolicyKind::Newsletter => &self.newsletter,
            PolicyKind::Api => &self.api,
            PolicyKind::Login => &self.login,
        }
    }

    /// Sweep expired entries from every limiter (called periodically).
    pub async fn sweep(&self) {
        self.contact_form.sweep().await;
        self.chatbot.sweep().await;
        self.newsletter.sweep().await;
        self.api.sweep().await;
        self.login.sweep().await;
    }
}
