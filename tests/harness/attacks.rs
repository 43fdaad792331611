// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Attack pattern configurations for security testing.

/// What kind of body each simulated request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// Well-formed human submission
    Clean,
    /// Primary honeypot filled
    Honeypot,
    /// Backup honeypot filled, primary left empty
    BackupHoneypot,
    /// Render-to-submit time far below the human minimum
    FastSubmit,
}

/// What kind of headers each simulated request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientShape {
    /// Real browser headers
    Browser,
    /// Automation user agent, otherwise browser-like
    Automation,
    /// No Accept / Accept-Language headers
    Headless,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique client IPs to simulate
    pub unique_ips: usize,
    /// Body shape for every request
    pub body: BodyShape,
    /// Header shape for every request
    pub client: ClientShape,
    /// Milliseconds between simulated requests (drives the synthetic clock)
    pub spacing_ms: i64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 1,
            body: BodyShape::Clean,
            client: ClientShape::Browser,
            spacing_ms: 10,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single IP flood - basic form spam from one source.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            unique_ips: 1,
            spacing_ms: 5,
            ..Default::default()
        }
    }

    /// Distributed attack - many IPs, few requests each.
    pub fn distributed_attack() -> Self {
        Self {
            total_requests: 200,
            unique_ips: 100,
            spacing_ms: 5,
            ..Default::default()
        }
    }

    /// Naive form-filler bot: fills every field, honeypots included.
    pub fn honeypot_spam() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 10,
            body: BodyShape::Honeypot,
            ..Default::default()
        }
    }

    /// Smarter bot that skips "website" but falls for the decoy label.
    pub fn backup_honeypot_spam() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 10,
            body: BodyShape::BackupHoneypot,
            ..Default::default()
        }
    }

    /// Scripted clients announcing themselves in the user agent.
    pub fn scripted_clients() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 10,
            client: ClientShape::Automation,
            ..Default::default()
        }
    }

    /// Clients missing the headers every real browser sends.
    pub fn headless_flood() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 10,
            client: ClientShape::Headless,
            ..Default::default()
        }
    }

    /// Instant form submission, faster than any human can type.
    pub fn instant_submit() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 10,
            body: BodyShape::FastSubmit,
            ..Default::default()
        }
    }

    /// Legitimate-looking slow drip that should pass untouched.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 20,
            unique_ips: 20,
            spacing_ms: 3_000,
            ..Default::default()
        }
    }
}
