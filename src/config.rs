// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the form-submission admission gate.
//!
//! Default policy values match what the admin back office expects for each
//! gated endpoint; see the table in the README.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for the admission gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Named rate-limit policies, one per gated endpoint
    #[serde(default)]
    pub policies: PolicyTable,

    /// Bot detection configuration
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// A single fixed-window rate-limit policy.
///
/// Immutable per limiter instance. `message` is what a rejected client sees
/// in the 429 body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Maximum requests admitted per window
    pub max_requests: u32,

    /// Window length in milliseconds
    pub window_ms: i64,

    /// Human-readable rejection message
    pub message: String,
}

impl RateLimitPolicy {
    /// Contact form submissions: 3 per 5 minutes.
    pub fn contact_form() -> Self {
        Self {
            max_requests: 3,
            window_ms: 300_000,
            message: "Too many form submissions. Please try again in 5 minutes.".to_string(),
        }
    }

    /// Chat messages: 10 per minute.
    pub fn chatbot() -> Self {
        Self {
            max_requests: 10,
            window_ms: 60_000,
            message: "Too many messages. Please slow down.".to_string(),
        }
    }

    /// Newsletter signups: 2 per hour.
    pub fn newsletter() -> Self {
        Self {
            max_requests: 2,
            window_ms: 3_600_000,
            message: "Too many signup attempts. Please try again later.".to_string(),
        }
    }

    /// Catch-all API gate: 30 per minute.
    pub fn api() -> Self {
        Self {
            max_requests: 30,
            window_ms: 60_000,
            message: "Too many requests. Please try again later.".to_string(),
        }
    }

    /// Login attempts: 5 per 15 minutes.
    pub fn login() -> Self {
        Self {
            max_requests: 5,
            window_ms: 900_000,
            message: "Too many login attempts. Please try again in 15 minutes.".to_string(),
        }
    }

    /// Window length as a [`Duration`].
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms.max(0) as u64)
    }
}

/// The five named policies. Each backs an independent limiter with its own
/// entry store; they never share counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTable {
    #[serde(default = "RateLimitPolicy::contact_form")]
    pub contact_form: RateLimitPolicy,

    #[serde(default = "RateLimitPolicy::chatbot")]
    pub chatbot: RateLimitPolicy,

    #[serde(default = "RateLimitPolicy::newsletter")]
    pub newsletter: RateLimitPolicy,

    #[serde(default = "RateLimitPolicy::api")]
    pub api: RateLimitPolicy,

    #[serde(default = "RateLimitPolicy::login")]
    pub login: RateLimitPolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            contact_form: RateLimitPolicy::contact_form(),
            chatbot: RateLimitPolicy::chatbot(),
            newsletter: RateLimitPolicy::newsletter(),
            api: RateLimitPolicy::api(),
            login: RateLimitPolicy::login(),
        }
    }
}

/// Bot detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Primary honeypot field name (default: "website"). The backup honeypot
    /// is derived as `{honeypot_field}_backup`.
    #[serde(default = "default_honeypot_field")]
    pub honeypot_field: String,

    /// Field carrying the client-recorded form-render timestamp, epoch ms
    /// (default: "form_rendered_at")
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,

    /// Minimum believable render-to-submit time in milliseconds (default: 2000).
    /// Submissions faster than this are classified as bots; exactly this fast
    /// is still human.
    #[serde(default = "default_min_fill_ms")]
    pub min_fill_ms: i64,

    /// User-agent substrings that mark automation (matched case-insensitively)
    #[serde(default = "default_ua_patterns")]
    pub ua_patterns: Vec<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_honeypot_field() -> String {
    "website".to_string()
}

fn default_timestamp_field() -> String {
    "form_rendered_at".to_string()
}

fn default_min_fill_ms() -> i64 {
    2000
}

fn default_ua_patterns() -> Vec<String> {
    ["bot", "crawl", "spider", "scrape", "curl", "wget", "python"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            policies: PolicyTable::default(),
            detection: DetectionConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            honeypot_field: default_honeypot_field(),
            timestamp_field: default_timestamp_field(),
            min_fill_ms: default_min_fill_ms(),
            ua_patterns: default_ua_patterns(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl DetectionConfig {
    /// Name of the derived backup honeypot field.
    pub fn backup_honeypot_field(&self) -> String {
        format!("{}_backup", self.honeypot_field)
    }
}
