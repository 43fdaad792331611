// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for attack simulation.

use axum::http::{header, HeaderMap};
use serde_json::{json, Map, Value};

/// Generate a pool of client IP strings (10.x.x.x private range).
pub fn generate_ips(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{}.{}.{}", a, b, c)
        })
        .collect()
}

/// Headers a real browser would send.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15"
            .parse()
            .unwrap(),
    );
    headers.insert(
        header::ACCEPT,
        "text/html,application/xhtml+xml".parse().unwrap(),
    );
    headers.insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5".parse().unwrap());
    headers
}

/// Browser-looking headers with the given user agent substituted.
pub fn headers_with_agent(agent: &str) -> HeaderMap {
    let mut headers = browser_headers();
    headers.insert(header::USER_AGENT, agent.parse().unwrap());
    headers
}

/// Headers from a client that never set the usual browser headers.
pub fn headless_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, "Mozilla/5.0".parse().unwrap());
    headers
}

/// User agents of common automation tooling.
pub fn automation_agents() -> Vec<&'static str> {
    vec![
        "curl/8.4.0",
        "Wget/1.21.3",
        "python-requests/2.31.0",
        "Scrapy/2.11 (+https://scrapy.org)",
        "Mozilla/5.0 (compatible; Googlebot/2.1)",
        "Mozilla/5.0 (compatible; SemrushBot/7~bl)",
        "spider-agent/1.0",
    ]
}

/// A well-formed human submission; honeypot fields present but empty, as the
/// client-side form renders them.
pub fn clean_submission(i: usize) -> Map<String, Value> {
    json!({
        "name": format!("Visitor {}", i),
        "email": format!("visitor{}@example.com", i),
        "message": "I would like to hear more about your services.",
        "website": "",
        "website_backup": "",
    })
    .as_object()
    .unwrap()
    .clone()
}

/// A submission with the primary (or backup) honeypot filled.
pub fn honeypot_submission(i: usize, backup: bool) -> Map<String, Value> {
    let mut fields = clean_submission(i);
    let field = if backup { "website_backup" } else { "website" };
    fields.insert(
        field.to_string(),
        json!(format!("http://spam-{}.example.biz", i)),
    );
    fields
}

/// A submission carrying a render timestamp `elapsed_ms` before `now_ms`.
pub fn timed_submission(i: usize, now_ms: i64, elapsed_ms: i64) -> Map<String, Value> {
    let mut fields = clean_submission(i);
    fields.insert("form_rendered_at".to_string(), json!(now_ms - elapsed_ms));
    fields
}
