// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

use std::sync::Arc;

use crate::storage::JsonStore;
use crate::trust::ProvisionPolicy;

/// Shared state for the internal audits API.
///
/// The store performs per-file point reads and atomic writes, so no lock is
/// held across requests.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<JsonStore>,
    pub provision: ProvisionPolicy,
}

impl AppState {
    pub fn new(storage: JsonStore, provision: ProvisionPolicy) -> Self {
        Self {
            storage: Arc::new(storage),
            provision,
        }
    }
}
