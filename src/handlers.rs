// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP handlers and the admission gate for form-accepting endpoints.
//!
//! Every gated POST goes through [`admit`]: rate limit first, bot detection
//! second, downstream handler last. A rate-limited client gets an honest 429;
//! a detected bot gets a decoy success so the automation does not learn it
//! was caught. `X-RateLimit-*` headers are set on every gated response
//! regardless of outcome.

use crate::config::Config;
use crate::detector::BotDetector;
use crate::limiter::{Decision, Gate, PolicyKind};
use crate::metrics;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Body returned for every accepted submission, and as the decoy for
/// detected bots. The two are deliberately indistinguishable.
pub const THANK_YOU: &str = "Thank you for your submission!";

/// Shared application state.
pub struct AppState {
    pub gate: Gate,
    pub detector: BotDetector,
    pub config: Config,
}

/// Submission acknowledgement body.
#[derive(Debug, Serialize)]
pub struct SubmitAck {
    pub success: bool,
    pub message: &'static str,
}

/// 429 body for rate-limited clients.
#[derive(Debug, Serialize)]
pub struct RateLimitedBody {
    pub success: bool,
    pub error: String,
    /// Seconds until the client's window resets
    #[serde(rename = "retryAfter")]
    pub retry_after: u64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// A request that cleared the gate.
#[derive(Debug)]
pub struct Granted {
    /// Parsed submission fields; `None` when the body was not a JSON object
    /// (the gate fails open and the downstream handler still runs)
    pub fields: Option<Map<String, Value>>,
    limit: u32,
    decision: Decision,
}

impl Granted {
    /// Build the downstream response with the rate-limit headers attached.
    pub fn respond<R: IntoResponse>(&self, inner: R) -> Response {
        with_rate_headers(inner.into_response(), self.limit, &self.decision)
    }
}

/// Extract the client identifier from proxy headers.
///
/// `X-Forwarded-For` first entry, then `X-Real-IP`, then the literal
/// `"unknown"` so requests without either still share one rate bucket.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

/// Run the admission gate for one request.
///
/// Returns the cleared request, or the short-circuit response (429 for a
/// rate-limited client, decoy 200 for a detected bot).
pub async fn admit(
    state: &AppState,
    kind: PolicyKind,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Granted, Response> {
    metrics::GATED_REQUESTS.with_label_values(&[kind.as_str()]).inc();

    let ip = client_ip(headers);
    let limiter = state.gate.limiter(kind);
    let limit = limiter.policy().max_requests;
    let decision = limiter.check(&ip).await;

    if let Decision::Limited {
        ref message,
        retry_after,
        ..
    } = decision
    {
        metrics::REQUESTS_LIMITED.with_label_values(&[kind.as_str()]).inc();
        // Round up so "retry after 0s" never undersells an active window
        let retry_secs = (retry_after.as_millis() as u64).div_ceil(1000);
        let response = (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_secs.to_string())],
            Json(RateLimitedBody {
                success: false,
                error: message.clone(),
                retry_after: retry_secs,
            }),
        )
            .into_response();
        return Err(with_rate_headers(response, limit, &decision));
    }

    // Parse the body for the detector. A body that is not a JSON object is
    // passed through untouched: the gate fails open on detector input errors
    // rather than rejecting traffic it cannot inspect.
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => {
            debug!(policy = %kind, ip = %ip, "body is not a JSON object, skipping bot detection");
            None
        }
    };

    if let Some(ref fields) = fields {
        if let Some(signal) = state.detector.detect(fields, headers) {
            let user_agent = headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            warn!(
                policy = %kind,
                ip = %ip,
                user_agent,
                signal = %signal,
                kind = signal.kind(),
                "bot detected, serving decoy response"
            );
            metrics::BOTS_TRAPPED.with_label_values(&[signal.kind()]).inc();

            // Deliberate deception: answer exactly like a successful
            // submission so the automation does not adapt.
            let response = Json(SubmitAck {
                success: true,
                message: THANK_YOU,
            })
            .into_response();
            return Err(with_rate_headers(response, limit, &decision));
        }
    }

    metrics::REQUESTS_ADMITTED.with_label_values(&[kind.as_str()]).inc();
    Ok(Granted {
        fields,
        limit,
        decision,
    })
}

/// Attach `X-RateLimit-Limit` / `-Remaining` / `-Reset` to a response.
/// Reset is an ISO-8601 timestamp for client-side backoff UX.
fn with_rate_headers(mut response: Response, limit: u32, decision: &Decision) -> Response {
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-limit"), v);
    }
    if let Ok(v) = HeaderValue::from_str(&decision.remaining().to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-remaining"), v);
    }
    if let Ok(v) = HeaderValue::from_str(&decision.reset_at().to_rfc3339()) {
        headers.insert(HeaderName::from_static("x-ratelimit-reset"), v);
    }
    response
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "formgate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics_text() -> String {
    metrics::render()
}

/// Contact form submissions. Lead storage is an external collaborator; this
/// service acknowledges and hands off.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let granted = match admit(&state, PolicyKind::ContactForm, &headers, &body).await {
        Ok(granted) => granted,
        Err(response) => return response,
    };

    info!(
        ip = %client_ip(&headers),
        fields = granted.fields.as_ref().map(|f| f.len()).unwrap_or(0),
        "contact submission accepted"
    );
    granted.respond(Json(SubmitAck {
        success: true,
        message: THANK_YOU,
    }))
}

/// Chat messages.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let granted = match admit(&state, PolicyKind::Chatbot, &headers, &body).await {
        Ok(granted) => granted,
        Err(response) => return response,
    };

    granted.respond(Json(SubmitAck {
        success: true,
        message: "Message received.",
    }))
}

/// Newsletter signups.
pub async fn newsletter(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let granted = match admit(&state, PolicyKind::Newsletter, &headers, &body).await {
        Ok(granted) => granted,
        Err(response) => return response,
    };

    granted.respond(Json(SubmitAck {
        success: true,
        message: THANK_YOU,
    }))
}

/// Login attempts. Credential verification is the back office's concern;
/// this gate only throttles and filters.
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let granted = match admit(&state, PolicyKind::Login, &headers, &body).await {
        Ok(granted) => granted,
        Err(response) => return response,
    };

    granted.respond(Json(SubmitAck {
        success: true,
        message: "Login request accepted.",
    }))
}

/// Catch-all gate for miscellaneous API posts.
pub async fn api_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let granted = match admit(&state, PolicyKind::Api, &headers, &body).await {
        Ok(granted) => granted,
        Err(response) => return response,
    };

    granted.respond(Json(SubmitAck {
        success: true,
        message: "Accepted.",
    }))
}
