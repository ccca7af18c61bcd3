// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! # Edge Token Verification
//!
//! This module terminates Auth0 bearer tokens at the gateway. Only the edge
//! verifies signatures; internal services trust the forwarded identity
//! header instead of re-validating tokens.
//!
//! ## Verification Flow
//!
//! 1. Client sends `Authorization: Bearer <Auth0 JWT>`
//! 2. Gateway:
//!    - Fetches Auth0 JWKS via HTTPS (cached with TTL)
//!    - Verifies JWT signature, expiry, issuer, audience
//!    - Extracts:
//!      - `sub` → forwarded as `x-user-id`
//!      - `email`/`name` → forwarded as verified profile headers
//!
//! ## Security
//!
//! - JWKS fetching is HTTPS-only with a bounded timeout
//! - JWKS unavailability fails closed: the token is rejected, never
//!   accepted unverified
//! - Verification failures return a generic 401; internals are only logged
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod jwks;
pub mod verifier;

pub use claims::VerifiedIdentity;
pub use error::AuthError;
pub use jwks::JwksManager;
pub use verifier::TokenVerifier;
