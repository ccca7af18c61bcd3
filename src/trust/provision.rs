// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Auto-provisioning of user records.
//!
//! Users are created lazily on their first request through the gateway.
//! Provisioning requires the gateway-forwarded verified profile (at least
//! `x-user-email`): a bare identity header can resolve an existing record
//! but never create one, so a forged or stale subject cannot mint users.
//!
//! Concurrent first requests for the same subject race on exclusive file
//! creation; the loser treats `AlreadyExists` as "created by the other
//! request" and re-reads instead of merging.

use chrono::Utc;
use uuid::Uuid;

use crate::config::AuditsApiConfig;
use crate::storage::{StorageError, StorageResult, StoredUser, UserRepository};

use super::Role;

/// Policy knobs for auto-provisioning.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionPolicy {
    /// Create a record for unknown identities carrying a verified profile.
    pub auto_provision: bool,
    /// Promote the very first provisioned user to admin. Opt-in.
    pub bootstrap_admin: bool,
    /// Role assigned to newly provisioned users.
    pub default_role: Role,
}

impl Default for ProvisionPolicy {
    fn default() -> Self {
        Self {
            auto_provision: true,
            bootstrap_admin: false,
            default_role: Role::Employee,
        }
    }
}

impl From<&AuditsApiConfig> for ProvisionPolicy {
    fn from(config: &AuditsApiConfig) -> Self {
        Self {
            auto_provision: config.auto_provision,
            bootstrap_admin: config.bootstrap_admin,
            default_role: config.default_role,
        }
    }
}

/// Verified profile claims forwarded by the gateway.
#[derive(Debug, Clone, Default)]
pub struct ForwardedProfile {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl ForwardedProfile {
    /// A profile can provision a user only when the verified email is present.
    pub fn is_provisionable(&self) -> bool {
        self.email.is_some()
    }
}

/// Resolve a forwarded subject to a user record.
///
/// Returns `Ok(None)` when the subject is unknown and not provisionable;
/// the caller answers 401. An existing record is enriched in place when the
/// forwarded profile differs from what is stored.
pub fn resolve_user(
    repo: &UserRepository<'_>,
    policy: &ProvisionPolicy,
    subject: &str,
    profile: &ForwardedProfile,
) -> StorageResult<Option<StoredUser>> {
    match repo.get_by_subject(subject) {
        Ok(user) => enrich(repo, user, profile).map(Some),
        Err(StorageError::NotFound(_)) => {
            if !policy.auto_provision || !profile.is_provisionable() {
                return Ok(None);
            }
            provision(repo, policy, subject, profile).map(Some)
        }
        Err(e) => Err(e),
    }
}

fn provision(
    repo: &UserRepository<'_>,
    policy: &ProvisionPolicy,
    subject: &str,
    profile: &ForwardedProfile,
) -> StorageResult<StoredUser> {
    let role = if policy.bootstrap_admin && repo.count()? == 0 {
        Role::Admin
    } else {
        policy.default_role
    };

    let now = Utc::now();
    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        subject: subject.to_string(),
        email: profile.email.clone(),
        name: profile.name.clone(),
        role,
        created_at: now,
        updated_at: now,
    };

    match repo.create(&user) {
        Ok(()) => {
            tracing::info!(subject, role = %user.role, "provisioned user on first request");
            Ok(user)
        }
        // A concurrent request won the exclusive create; theirs is the record.
        Err(StorageError::AlreadyExists(_)) => repo.get_by_subject(subject),
        Err(e) => Err(e),
    }
}

fn enrich(
    repo: &UserRepository<'_>,
    mut user: StoredUser,
    profile: &ForwardedProfile,
) -> StorageResult<StoredUser> {
    let mut changed = false;

    if let Some(email) = &profile.email {
        if user.email.as_deref() != Some(email.as_str()) {
            user.email = Some(email.clone());
            changed = true;
        }
    }
    if let Some(name) = &profile.name {
        if user.name.as_deref() != Some(name.as_str()) {
            user.name = Some(name.clone());
            changed = true;
        }
    }

    if changed {
        user.updated_at = Utc::now();
        repo.update(&user)?;
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonStore, StoragePaths};
    use tempfile::TempDir;

    fn test_store() -> (JsonStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = JsonStore::new(StoragePaths::new(temp_dir.path()));
        store.initialize().expect("Failed to initialize");
        (store, temp_dir)
    }

    fn profile(email: &str) -> ForwardedProfile {
        ForwardedProfile {
            email: Some(email.to_string()),
            name: Some("Test User".to_string()),
        }
    }

    #[test]
    fn unknown_subject_without_profile_is_not_provisioned() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        let resolved =
            resolve_user(&repo, &policy, "auth0|999", &ForwardedProfile::default()).unwrap();
        assert!(resolved.is_none());
        assert!(!repo.exists("auth0|999"));
    }

    #[test]
    fn unknown_subject_with_profile_is_provisioned_as_employee() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        let user = resolve_user(&repo, &policy, "auth0|new", &profile("new@example.com"))
            .unwrap()
            .expect("should provision");
        assert_eq!(user.subject, "auth0|new");
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.email.as_deref(), Some("new@example.com"));
        assert!(repo.exists("auth0|new"));
    }

    #[test]
    fn provisioning_disabled_never_creates() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy {
            auto_provision: false,
            ..Default::default()
        };

        let resolved =
            resolve_user(&repo, &policy, "auth0|new", &profile("new@example.com")).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn bootstrap_admin_promotes_only_the_first_user() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy {
            bootstrap_admin: true,
            ..Default::default()
        };

        let first = resolve_user(&repo, &policy, "auth0|first", &profile("a@example.com"))
            .unwrap()
            .unwrap();
        let second = resolve_user(&repo, &policy, "auth0|second", &profile("b@example.com"))
            .unwrap()
            .unwrap();

        assert_eq!(first.role, Role::Admin);
        assert_eq!(second.role, Role::Employee);
    }

    #[test]
    fn bootstrap_admin_is_off_by_default() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        let first = resolve_user(&repo, &policy, "auth0|first", &profile("a@example.com"))
            .unwrap()
            .unwrap();
        assert_eq!(first.role, Role::Employee);
    }

    #[test]
    fn resolving_twice_returns_the_same_record() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        let first = resolve_user(&repo, &policy, "auth0|same", &profile("s@example.com"))
            .unwrap()
            .unwrap();
        let second = resolve_user(&repo, &policy, "auth0|same", &profile("s@example.com"))
            .unwrap()
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn losing_the_create_race_resolves_to_the_winner() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        // Simulate the concurrent winner by creating the record up front.
        let winner = resolve_user(&repo, &policy, "auth0|race", &profile("w@example.com"))
            .unwrap()
            .unwrap();

        // The loser's create fails with AlreadyExists and re-reads.
        let loser = resolve_user(&repo, &policy, "auth0|race", &profile("w@example.com"))
            .unwrap()
            .unwrap();
        assert_eq!(winner.id, loser.id);
    }

    #[test]
    fn existing_record_is_enriched_from_profile() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        resolve_user(&repo, &policy, "auth0|up", &profile("old@example.com"))
            .unwrap()
            .unwrap();

        let updated = resolve_user(&repo, &policy, "auth0|up", &profile("new@example.com"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("new@example.com"));

        let stored = repo.get_by_subject("auth0|up").unwrap();
        assert_eq!(stored.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn bare_lookup_does_not_wipe_profile() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let policy = ProvisionPolicy::default();

        resolve_user(&repo, &policy, "auth0|keep", &profile("keep@example.com"))
            .unwrap()
            .unwrap();

        // Later request without profile headers: record is returned as-is.
        let resolved =
            resolve_user(&repo, &policy, "auth0|keep", &ForwardedProfile::default())
                .unwrap()
                .unwrap();
        assert_eq!(resolved.email.as_deref(), Some("keep@example.com"));
    }
}
