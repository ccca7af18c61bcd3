// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Path constants and utilities for the user store layout.
//!
//! Identity-provider subjects (e.g. `auth0|abc123`) contain characters that
//! are not filesystem-safe, so user files are named by a percent-encoded
//! form of the subject. Encoding the subject into the file name is what
//! gives the store exact-match point lookup and a uniqueness constraint by
//! construction: two records for the same subject would be the same file.

use std::path::{Path, PathBuf};

/// Base directory for all persistent storage.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user record, keyed by external subject.
    pub fn user(&self, subject: &str) -> PathBuf {
        self.users_dir()
            .join(format!("{}.json", encode_subject(subject)))
    }
}

/// Percent-encode a subject into a filesystem-safe file stem.
///
/// Alphanumerics plus `.`, `_`, `-` pass through; every other byte becomes
/// `%XX`. The mapping is injective, so distinct subjects never collide.
pub fn encode_subject(subject: &str) -> String {
    let mut encoded = String::with_capacity(subject.len());
    for byte in subject.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(byte as char)
            }
            other => {
                encoded.push('%');
                encoded.push_str(&format!("{other:02X}"));
            }
        }
    }
    encoded
}
