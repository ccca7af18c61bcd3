// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! User endpoints.
//!
//! `/v1/users/me` is available to every provisioned user; the listing and
//! role-change endpoints require the admin role, enforced by the
//! [`AdminOnly`] extractor.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    error::ApiError,
    models::{UpdateRoleRequest, UserListResponse, UserResponse},
    state::AppState,
    storage::UserRepository,
    trust::{AdminOnly, CurrentUser},
};

/// Get the current authenticated user's record.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unknown or missing identity"),
    )
)]
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// List all user records (admin only).
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, oldest first", body = UserListResponse),
        (status = 401, description = "Unknown or missing identity"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let users: Vec<UserResponse> = repo.list_all()?.into_iter().map(Into::into).collect();
    let total = users.len();
    Ok(Json(UserListResponse { users, total }))
}

/// Change a user's role (admin only).
#[utoipa::path(
    put,
    path = "/v1/users/{subject}/role",
    params(
        ("subject" = String, Path, description = "Identity-provider subject of the user")
    ),
    request_body = UpdateRoleRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Unknown or missing identity"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn update_user_role(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(subject): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let mut user = repo.get_by_subject(&subject)?;

    if user.role != request.role {
        tracing::info!(
            subject = %user.subject,
            from = %user.role,
            to = %request.role,
            changed_by = %admin.subject,
            "role changed"
        );
        user.role = request.role;
        user.updated_at = Utc::now();
        repo.update(&user)?;
    }

    Ok(Json(user.into()))
}
