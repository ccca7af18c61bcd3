// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Repository layer providing typed access to the JSON store.

pub mod users;

pub use users::{StoredUser, UserRepository};
