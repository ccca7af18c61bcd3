// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! User repository.
//!
//! One JSON file per user, keyed by the external subject. Lookups are exact
//! point reads; creation is exclusive, so the subject uniquely determines
//! at most one record even under concurrent first requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{JsonStore, StorageError, StorageResult};
use crate::trust::Role;

/// User record persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredUser {
    /// Local user identifier (UUID)
    pub id: String,
    /// Identity-provider subject claim (e.g. `auth0|abc123`)
    pub subject: String,
    /// Email address, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Authorization role
    pub role: Role,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Repository for user operations on the JSON store.
pub struct UserRepository<'a> {
    store: &'a JsonStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Check if a user exists for the given subject.
    pub fn exists(&self, subject: &str) -> bool {
        self.store.exists(self.store.paths().user(subject))
    }

    /// Get a user by external subject (exact match).
    pub fn get_by_subject(&self, subject: &str) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(subject);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("user {subject}")));
        }
        self.store.read_json(path)
    }

    /// Create a new user.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when a record for the
    /// subject exists, including when a concurrent request created it first.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        self.store
            .create_json_new(self.store.paths().user(&user.subject), user)
    }

    /// Update an existing user.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.subject) {
            return Err(StorageError::NotFound(format!("user {}", user.subject)));
        }
        self.store
            .write_json(self.store.paths().user(&user.subject), user)
    }

    /// Delete a user by subject.
    pub fn delete(&self, subject: &str) -> StorageResult<()> {
        if !self.exists(subject) {
            return Err(StorageError::NotFound(format!("user {subject}")));
        }
        self.store.delete(self.store.paths().user(subject))
    }

    /// List all user records (admin view).
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let stems = self
            .store
            .list_files(self.store.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for stem in stems {
            let path = self
                .store
                .paths()
                .users_dir()
                .join(format!("{stem}.json"));
            if let Ok(user) = self.store.read_json::<StoredUser>(&path) {
                users.push(user);
            }
        }

        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    /// Count user records.
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self
            .store
            .list_files(self.store.paths().users_dir(), "json")?
            .len())
    }
}
