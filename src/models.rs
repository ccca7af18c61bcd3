// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! # API Data Models
//!
//! Request and response structures for the internal audits API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredUser;
use crate::trust::Role;

/// Public view of a user record.
///
/// The local id and subject are both returned; clients key on `subject`
/// (the identity-provider id, e.g. `auth0|abc123`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    /// Local user identifier (UUID).
    pub id: String,
    /// Identity-provider subject claim.
    pub subject: String,
    /// Email address, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Authorization role.
    pub role: Role,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            subject: user.subject,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Response for the admin user listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    /// All known user records.
    pub users: Vec<UserResponse>,
    /// Total count.
    pub total: usize,
}

/// Request to change a user's role (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// The role to assign.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_from_stored_user() {
        let stored = StoredUser {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            subject: "auth0|123".to_string(),
            email: Some("ines@example.com".to_string()),
            name: None,
            role: Role::Manager,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: UserResponse = stored.clone().into();
        assert_eq!(response.subject, "auth0|123");
        assert_eq!(response.role, Role::Manager);
        assert_eq!(response.email.as_deref(), Some("ines@example.com"));
        assert!(response.name.is_none());
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let response = UserResponse {
            id: "id".to_string(),
            subject: "auth0|9".to_string(),
            email: None,
            name: None,
            role: Role::Employee,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("email"));
        assert!(!json.contains("\"name\""));
    }
}
