// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Trust-boundary errors for the internal service.
//!
//! `MissingIdentity` and `UnknownIdentity` both answer 401 with the same
//! body (the caller must not learn which), but they are logged under
//! distinct messages for operability.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error raised by the trusted-header middleware and role gates.
#[derive(Debug)]
pub enum TrustError {
    /// The trusted identity header is absent or empty
    MissingIdentity,
    /// The forwarded identity matches no local user record
    UnknownIdentity,
    /// Identity resolved, but the role does not satisfy the route
    InsufficientRole,
    /// Store failure while resolving the identity
    Internal(String),
}

#[derive(Serialize)]
struct TrustErrorBody {
    error: &'static str,
}

impl TrustError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrustError::MissingIdentity | TrustError::UnknownIdentity => StatusCode::UNAUTHORIZED,
            TrustError::InsufficientRole => StatusCode::FORBIDDEN,
            TrustError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            _ => "internal error",
        }
    }
}

impl std::fmt::Display for TrustError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrustError::MissingIdentity => write!(f, "trusted identity header missing"),
            TrustError::UnknownIdentity => write!(f, "forwarded identity has no local user record"),
            TrustError::InsufficientRole => write!(f, "role does not satisfy route requirement"),
            TrustError::Internal(msg) => write!(f, "identity resolution failed: {msg}"),
        }
    }
}

impl std::error::Error for TrustError {}

impl IntoResponse for TrustError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(TrustErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
