// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Public edge of the platform.
//!
//! ## Responsibilities
//!
//! - Terminate bearer-token authentication: every request under
//!   `/api/audits` must carry a valid Auth0 access token.
//! - Forward verified requests to the internal audits API with the
//!   trusted identity headers injected (see [`proxy`]).
//! - Assign or propagate `x-request-id` so a request can be correlated
//!   across both services.
//!
//! The gateway holds no user records and makes no authorization
//! decisions beyond "is this token valid". Roles are resolved behind
//! the trust boundary.

pub mod proxy;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;

use crate::auth::{AuthError, JwksManager, TokenVerifier};
use crate::config::GatewayConfig;
use crate::trust::REQUEST_ID_HEADER;

/// Shared gateway state.
#[derive(Clone)]
pub struct GatewayState {
    /// Edge token verifier.
    pub verifier: Arc<TokenVerifier>,
    /// Base URL of the internal audits API.
    pub upstream: Url,
    /// HTTP client used for forwarding.
    pub client: reqwest::Client,
}

impl GatewayState {
    pub fn new(verifier: TokenVerifier, upstream: Url, upstream_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            verifier: Arc::new(verifier),
            upstream,
            client,
        }
    }

    /// Build the state from environment configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let verifier = match &config.jwks_url {
            Some(url) => TokenVerifier::new(
                JwksManager::new(url.clone()),
                &config.issuer,
                &config.audience,
            ),
            None => {
                #[cfg(feature = "dev")]
                {
                    tracing::warn!(
                        "AUTH0_JWKS_URL not set; token signatures are NOT verified"
                    );
                    TokenVerifier::insecure(&config.issuer, &config.audience)
                }
                #[cfg(not(feature = "dev"))]
                {
                    // Config loading requires the JWKS URL in release builds.
                    unreachable!("missing AUTH0_JWKS_URL slipped past configuration")
                }
            }
        };
        Self::new(verifier, config.audits_api_url.clone(), config.upstream_timeout)
    }
}

/// Build the gateway router.
///
/// `/healthz` is public; everything under `/api/audits` requires a valid
/// bearer token and is proxied to the internal audits API. Unmatched
/// routes return 404 without touching the upstream.
pub fn router(state: GatewayState) -> Router {
    let proxied = Router::new()
        .fallback(proxy::forward)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state.clone());

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/audits", proxied)
        .fallback(not_found)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Edge authentication middleware.
///
/// Extracts the bearer token, verifies it, and attaches the resulting
/// [`crate::auth::VerifiedIdentity`] to the request. Every failure is a
/// 401 with a generic body; the reason is only logged.
async fn authenticate(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let Some(auth_header) = request.headers().get(header::AUTHORIZATION) else {
        tracing::warn!(request_id, "request without authorization header");
        return AuthError::MissingAuthHeader.into_response();
    };

    let token = match auth_header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        Some(token) if !token.trim().is_empty() => token.trim(),
        _ => {
            tracing::warn!(request_id, "malformed authorization header");
            return AuthError::InvalidAuthHeader.into_response();
        }
    };

    match state.verifier.verify(token).await {
        Ok(identity) => {
            tracing::debug!(request_id, subject = %identity.subject, "token verified");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(request_id, error = %e, "token verification failed");
            e.into_response()
        }
    }
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let verifier = TokenVerifier::new(
            JwksManager::new("https://example.auth0.com/.well-known/jwks.json"),
            "https://example.auth0.com/",
            "https://api.example.com",
        );
        router(GatewayState::new(
            verifier,
            Url::parse("http://127.0.0.1:1").unwrap(),
            Duration::from_secs(2),
        ))
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = test_router()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn request_id_is_echoed_verbatim() {
        let response = test_router()
            .oneshot(
                Request::get("/healthz")
                    .header(REQUEST_ID_HEADER, "corr-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "corr-42");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = test_router()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn proxied_routes_require_a_token() {
        let response = test_router()
            .oneshot(
                Request::get("/api/audits/inspections")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_rejected() {
        let response = test_router()
            .oneshot(
                Request::get("/api/audits/inspections")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let response = test_router()
            .oneshot(
                Request::get("/api/audits/inspections")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unmatched_routes_are_not_proxied() {
        let response = test_router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
