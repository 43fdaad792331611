// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Outcome collection for attack simulation runs.

use std::collections::HashMap;
use std::time::Duration;

/// Possible outcomes for a simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Passed the gate, downstream handler would run
    Admitted,
    /// Rejected by the rate limiter (honest 429)
    RateLimited,
    /// Classified as a bot (decoy 200), labelled by signal kind
    Trapped(&'static str),
}

/// Collects outcomes during an attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Outcome, usize>,
    requests_per_ip: HashMap<String, usize>,
    latencies: Vec<Duration>,
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct Report {
    pub total_requests: usize,
    pub admitted: usize,
    pub rate_limited: usize,
    pub trapped: usize,
    pub unique_ips: usize,
    pub block_rate: f64,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request outcome.
    pub fn record(&mut self, outcome: Outcome, ip: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_ip.entry(ip.to_string()).or_insert(0) += 1;
        self.latencies.push(latency);
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Requests classified as bots, across all signal kinds.
    pub fn trapped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(o, _)| matches!(o, Outcome::Trapped(_)))
            .map(|(_, n)| n)
            .sum()
    }

    /// Median check latency over the run.
    pub fn median_latency(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort();
        sorted[sorted.len() / 2]
    }

    pub fn report(&self) -> Report {
        let total = self.total_requests();
        let admitted = self.count(Outcome::Admitted);
        let blocked = total - admitted;
        Report {
            total_requests: total,
            admitted,
            rate_limited: self.count(Outcome::RateLimited),
            trapped: self.trapped(),
            unique_ips: self.requests_per_ip.len(),
            block_rate: if total > 0 {
                blocked as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack simulation report ===")?;
        writeln!(f, "total:        {}", self.total_requests)?;
        writeln!(f, "admitted:     {}", self.admitted)?;
        writeln!(f, "rate limited: {}", self.rate_limited)?;
        writeln!(f, "bot trapped:  {}", self.trapped)?;
        writeln!(f, "unique IPs:   {}", self.unique_ips)?;
        writeln!(f, "block rate:   {:.1}%", self.block_rate * 100.0)
    }
}
