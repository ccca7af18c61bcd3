// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Trusted-header middleware for the internal service.
//!
//! This is the only authentication path inside the trust boundary: the
//! forwarded `x-user-id` header is honored solely because the gateway set
//! it. A raw `Authorization` header reaching this service is ignored
//! entirely; there is no fallback verification here.
//!
//! Every rejection short-circuits before any handler runs and is logged
//! with the request correlation id.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::storage::UserRepository;

use super::provision::{resolve_user, ForwardedProfile};
use super::{TrustError, REQUEST_ID_HEADER, USER_EMAIL_HEADER, USER_ID_HEADER, USER_NAME_HEADER};

/// Resolve the forwarded identity and attach the user record.
///
/// Apply with `axum::middleware::from_fn_with_state(state, trust_gateway)`
/// on every route subtree that requires authentication.
pub async fn trust_gateway(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_id = header_str(request.headers(), REQUEST_ID_HEADER)
        .unwrap_or_default()
        .to_string();

    // Absent and empty are the same failure; no lookup happens for either.
    let subject = match header_str(request.headers(), USER_ID_HEADER) {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => {
            tracing::warn!(
                request_id = %request_id,
                "request rejected: trusted identity header missing"
            );
            return TrustError::MissingIdentity.into_response();
        }
    };

    let profile = ForwardedProfile {
        email: header_str(request.headers(), USER_EMAIL_HEADER).map(str::to_string),
        name: header_str(request.headers(), USER_NAME_HEADER).map(str::to_string),
    };

    let repo = UserRepository::new(&state.storage);
    match resolve_user(&repo, &state.provision, &subject, &profile) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!(
                request_id = %request_id,
                subject = %subject,
                "request rejected: forwarded identity has no local user record"
            );
            TrustError::UnknownIdentity.into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                subject = %subject,
                error = %e,
                "identity resolution failed"
            );
            TrustError::Internal(e.to_string()).into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
