// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Prometheus counters for the admission gate.

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec, Encoder, IntCounterVec, TextEncoder,
};

lazy_static! {
    pub static ref GATED_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "formgate_requests_total",
        "Requests seen by the admission gate, by policy",
        &["policy"]
    )
    .unwrap();
    pub static ref REQUESTS_ADMITTED: IntCounterVec = register_int_counter_vec!(
        "formgate_admitted_total",
        "Requests passed through to the downstream handler, by policy",
        &["policy"]
    )
    .unwrap();
    pub static ref REQUESTS_LIMITED: IntCounterVec = register_int_counter_vec!(
        "formgate_rate_limited_total",
        "Requests rejected by the rate limiter, by policy",
        &["policy"]
    )
    .unwrap();
    pub static ref BOTS_TRAPPED: IntCounterVec = register_int_counter_vec!(
        "formgate_bots_trapped_total",
        "Submissions classified as automated, by signal",
        &["signal"]
    )
    .unwrap();
}

/// Encode all registered metrics in the Prometheus text format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
