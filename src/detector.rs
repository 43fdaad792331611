// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Honeypot and heuristic bot detection for form submissions.
//!
//! Signals are layered and independent: any single positive signal classifies
//! the submission as automated (logical OR, not a weighted score). Checks run
//! in a fixed order and short-circuit on the first match:
//!
//! 1. Primary honeypot field non-empty
//! 2. Backup honeypot field non-empty
//! 3. Render-to-submit time under the human minimum
//! 4. User-agent matches a known automation substring
//! 5. Missing `Accept` or `Accept-Language` header
//!
//! The honeypot fields are rendered off-screen by the client (not
//! `display:none`, which naive bots skip more reliably) and excluded from tab
//! order and assistive-technology traversal; legitimate clients always submit
//! them empty.

use crate::config::DetectionConfig;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Why a submission was classified as automated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BotSignal {
    #[error("honeypot field '{field}' was filled")]
    HoneypotFilled { field: String },

    #[error("backup honeypot field '{field}' was filled")]
    BackupHoneypotFilled { field: String },

    #[error("form submitted {elapsed_ms}ms after render, below the {min_ms}ms human minimum")]
    SubmittedTooFast { elapsed_ms: i64, min_ms: i64 },

    #[error("user agent matched automation pattern '{pattern}'")]
    AutomatedUserAgent { pattern: String },

    #[error("missing expected browser header '{header}'")]
    MissingBrowserHeader { header: &'static str },
}

impl BotSignal {
    /// Stable label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HoneypotFilled { .. } => "honeypot",
            Self::BackupHoneypotFilled { .. } => "backup_honeypot",
            Self::SubmittedTooFast { .. } => "too_fast",
            Self::AutomatedUserAgent { .. } => "user_agent",
            Self::MissingBrowserHeader { .. } => "missing_header",
        }
    }
}

/// Classifies inbound form submissions as human or automated.
pub struct BotDetector {
    config: DetectionConfig,
}

impl BotDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Classify a submission. Returns the first positive signal, or `None`
    /// for a submission that looks human.
    pub fn detect(&self, fields: &Map<String, Value>, headers: &HeaderMap) -> Option<BotSignal> {
        self.detect_at(fields, headers, Utc::now().timestamp_millis())
    }

    /// [`detect`](Self::detect) with an explicit submission time, epoch ms.
    pub fn detect_at(
        &self,
        fields: &Map<String, Value>,
        headers: &HeaderMap,
        now_ms: i64,
    ) -> Option<BotSignal> {
        // 1. Primary honeypot
        if field_is_filled(fields.get(&self.config.honeypot_field)) {
            debug!(field = %self.config.honeypot_field, "primary honeypot filled");
            return Some(BotSignal::HoneypotFilled {
                field: self.config.honeypot_field.clone(),
            });
        }

        // 2. Backup honeypot, for bots that learned to skip "website"
        let backup = self.config.backup_honeypot_field();
        if field_is_filled(fields.get(&backup)) {
            debug!(field = %backup, "backup honeypot filled");
            return Some(BotSignal::BackupHoneypotFilled { field: backup });
        }

        // 3. Submission speed, only when the client recorded a render time.
        // Exactly min_fill_ms is still considered human.
        if let Some(rendered_at) = timestamp_field(fields.get(&self.config.timestamp_field)) {
            let elapsed_ms = now_ms - rendered_at;
            if elapsed_ms < self.config.min_fill_ms {
                debug!(elapsed_ms, min_ms = self.config.min_fill_ms, "form filled too fast");
                return Some(BotSignal::SubmittedTooFast {
                    elapsed_ms,
                    min_ms: self.config.min_fill_ms,
                });
            }
        }

        // 4. User-agent signature
        if let Some(ua) = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
        {
            let ua_lower = ua.to_lowercase();
            if let Some(pattern) = self
                .config
                .ua_patterns
                .iter()
                .find(|p| ua_lower.contains(p.as_str()))
            {
                debug!(user_agent = %ua, pattern = %pattern, "automation user agent");
                return Some(BotSignal::AutomatedUserAgent {
                    pattern: pattern.clone(),
                });
            }
        }

        // 5. Real browsers always send these
        if !headers.contains_key(header::ACCEPT) {
            debug!("missing Accept header");
            return Some(BotSignal::MissingBrowserHeader { header: "accept" });
        }
        if !headers.contains_key(header::ACCEPT_LANGUAGE) {
            debug!("missing Accept-Language header");
            return Some(BotSignal::MissingBrowserHeader {
                header: "accept-language",
            });
        }

        None
    }
}

/// A honeypot counts as filled for any non-empty value, not just non-empty
/// strings: bots that post numbers or nested junk into hidden fields are
/// still bots.
fn field_is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Read an epoch-ms timestamp that clients may send as a number or a string.
fn timestamp_field(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}
