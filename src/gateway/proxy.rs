// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Upstream forwarding.
//!
//! After edge verification the request is replayed against the internal
//! audits API. Client-supplied credential and identity headers are
//! scrubbed first; the only identity the upstream sees is the one this
//! process verified.
//!
//! No automatic retry: upstream failure is surfaced to the caller as a
//! gateway error (503 for unreachable/timeout, 502 otherwise).

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::VerifiedIdentity;
use crate::trust::{USER_EMAIL_HEADER, USER_ID_HEADER, USER_NAME_HEADER};

use super::GatewayState;

/// Maximum buffered request/response body (10 MiB).
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Request headers never forwarded upstream.
///
/// Hop-by-hop headers plus everything identity-carrying: the upstream
/// trusts the gateway-injected headers only, so nothing the client sent in
/// that namespace may survive.
const SCRUBBED_REQUEST_HEADERS: &[&str] = &[
    "host",
    "connection",
    "keep-alive",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "expect",
    "content-length",
    "authorization",
    USER_ID_HEADER,
    USER_EMAIL_HEADER,
    USER_NAME_HEADER,
];

/// Response headers never forwarded back to the caller.
const SCRUBBED_RESPONSE_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// Upstream transport failure.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Upstream unreachable or timed out
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    /// Any other upstream transport failure
    #[error("upstream error: {0}")]
    BadGateway(String),
}

#[derive(Serialize)]
struct ProxyErrorBody {
    error: &'static str,
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        // Detail is logged by the handler; the caller gets a generic body.
        let status = self.status_code();
        let body = Json(ProxyErrorBody {
            error: match self {
                ProxyError::Unavailable(_) => "upstream unavailable",
                ProxyError::BadGateway(_) => "bad gateway",
            },
        });
        (status, body).into_response()
    }
}

/// Forward a verified request to the internal audits API.
///
/// Expects the auth middleware to have attached a [`VerifiedIdentity`];
/// a request reaching this handler without one is rejected, not forwarded.
pub async fn forward(State(state): State<GatewayState>, request: Request) -> Response {
    let Some(identity) = request.extensions().get::<VerifiedIdentity>().cloned() else {
        tracing::error!("proxy reached without a verified identity; rejecting");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    match forward_inner(&state, identity, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "upstream request failed");
            e.into_response()
        }
    }
}

async fn forward_inner(
    state: &GatewayState,
    identity: VerifiedIdentity,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ProxyError::BadGateway(format!("failed to buffer request body: {e}")))?;

    // The nested router already stripped the public prefix; what remains is
    // the upstream-relative path.
    let mut url = state.upstream.clone();
    let joined = format!(
        "{}{}",
        state.upstream.path().trim_end_matches('/'),
        parts.uri.path()
    );
    url.set_path(&joined);
    url.set_query(parts.uri.query());

    let mut headers = scrub_headers(&parts.headers, SCRUBBED_REQUEST_HEADERS);
    inject_identity(&mut headers, &identity);

    let upstream_response = state
        .client
        .request(parts.method, url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = upstream_response.status();
    let response_headers = scrub_headers(upstream_response.headers(), SCRUBBED_RESPONSE_HEADERS);

    let bytes = upstream_response
        .bytes()
        .await
        .map_err(|e| ProxyError::BadGateway(format!("failed to read upstream body: {e}")))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Copy a header map, dropping the named headers.
fn scrub_headers(headers: &HeaderMap, scrubbed: &[&str]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !scrubbed.contains(&name.as_str()) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Inject the trusted identity headers from the verified token.
fn inject_identity(headers: &mut HeaderMap, identity: &VerifiedIdentity) {
    set_header(headers, USER_ID_HEADER, &identity.subject);
    if let Some(email) = &identity.email {
        set_header(headers, USER_EMAIL_HEADER, email);
    }
    if let Some(name) = &identity.name {
        set_header(headers, USER_NAME_HEADER, name);
    }
}

fn set_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(HeaderName::from_static(name), v);
        }
        Err(_) => {
            // Claims can contain arbitrary unicode; skip what http forbids.
            tracing::warn!(header = name, "claim value not representable as header; skipped");
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> ProxyError {
    if e.is_timeout() || e.is_connect() {
        ProxyError::Unavailable(e.to_string())
    } else {
        ProxyError::BadGateway(e.to_string())
    }
}
