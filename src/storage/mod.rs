// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! # User Store
//!
//! Persistent storage for the only durable entity the trust boundary needs:
//! the local user record mapped from an identity-provider subject.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/
//!     {encoded-subject}.json    # One record per external identity
//! ```
//!
//! All access is point reads and atomic single-file writes; there are no
//! transactions and no locks. Uniqueness per subject is enforced by the
//! file name itself (see `paths::encode_subject`) together with exclusive
//! creation.

pub mod json_fs;
pub mod paths;
pub mod repository;

pub use json_fs::{JsonStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{StoredUser, UserRepository};
