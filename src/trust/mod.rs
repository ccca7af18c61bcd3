// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! # Internal Trust Middleware
//!
//! The receiving side of the trust boundary. The gateway is the only
//! process that verifies token signatures; this module converts the headers
//! it forwards into an authenticated user context.
//!
//! ## Trusted Header Contract
//!
//! Exactly one identity-carrying header is accepted: `x-user-id`, whose
//! value is the opaque identity-provider subject. Requests without it are
//! unauthorized regardless of any other header present - in particular a
//! raw `Authorization` header is never re-trusted here.
//!
//! ## Request Chain
//!
//! 1. `trust_gateway` middleware: header → local user record → request
//!    extensions (401 on absence or unknown identity, fail closed)
//! 2. Role gates (`AdminOnly`, `ManagerOrAbove`): 403 when the resolved
//!    user's role does not satisfy the route
//!
//! All failures are terminal for the request; no downstream handler runs.

pub mod error;
pub mod extractor;
pub mod middleware;
pub mod provision;
pub mod roles;

pub use error::TrustError;
pub use extractor::{AdminOnly, CurrentUser, ManagerOrAbove};
pub use middleware::trust_gateway;
pub use provision::{ForwardedProfile, ProvisionPolicy};
pub use roles::Role;

/// Identity-carrying header injected by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Verified email forwarded by the gateway (enables auto-provisioning).
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Verified display name forwarded by the gateway.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Request correlation header, echoed end to end.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
