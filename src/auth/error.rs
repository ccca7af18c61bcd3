// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Edge authentication errors.
//!
//! The variants carry enough detail for logging, but the HTTP response body
//! is deliberately generic: verification internals are never surfaced to
//! the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error raised during edge token verification.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token is malformed
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token issuer is invalid
    InvalidIssuer,
    /// Token audience is invalid
    InvalidAudience,
    /// Token is not yet valid
    TokenNotYetValid,
    /// JWKS fetch failed (identity provider unreachable)
    JwksFetchError(String),
    /// No matching key in JWKS
    NoMatchingKey,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    ///
    /// Provider unavailability fails closed but is reported as a gateway
    /// problem (503), not as a credential problem.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidIssuer
            | AuthError::InvalidAudience
            | AuthError::TokenNotYetValid
            | AuthError::NoMatchingKey => StatusCode::UNAUTHORIZED,
            AuthError::JwksFetchError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Generic message returned to the caller.
    fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "invalid or missing credentials",
            StatusCode::SERVICE_UNAVAILABLE => "authentication temporarily unavailable",
            _ => "internal error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "token is malformed"),
            AuthError::InvalidSignature => write!(f, "token signature is invalid"),
            AuthError::TokenExpired => write!(f, "token has expired"),
            AuthError::InvalidIssuer => write!(f, "token issuer is invalid"),
            AuthError::InvalidAudience => write!(f, "token audience is invalid"),
            AuthError::TokenNotYetValid => write!(f, "token is not yet valid"),
            AuthError::JwksFetchError(msg) => write!(f, "failed to fetch JWKS: {msg}"),
            AuthError::NoMatchingKey => write!(f, "no matching key found in JWKS"),
            AuthError::InternalError(msg) => write!(f, "internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
