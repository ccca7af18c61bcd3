// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Axum extractors for the resolved user and role gates.
//!
//! These read the record attached by the trust middleware; they never fall
//! back to any other authentication source. A handler using `CurrentUser`
//! on a route the middleware does not cover fails closed with 401.
//!
//! ```rust,ignore
//! async fn my_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     // user is the StoredUser resolved from the trusted header
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::state::AppState;
use crate::storage::StoredUser;

use super::{Role, TrustError};

/// Extractor for the user resolved by the trust middleware.
pub struct CurrentUser(pub StoredUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = TrustError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<StoredUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(TrustError::MissingIdentity)
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub StoredUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = TrustError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.has_privilege(Role::Admin) {
            return Err(TrustError::InsufficientRole);
        }

        Ok(AdminOnly(user))
    }
}

/// Extractor that requires manager privileges or above.
pub struct ManagerOrAbove(pub StoredUser);

impl FromRequestParts<AppState> for ManagerOrAbove {
    type Rejection = TrustError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.has_privilege(Role::Manager) {
            return Err(TrustError::InsufficientRole);
        }

        Ok(ManagerOrAbove(user))
    }
}
