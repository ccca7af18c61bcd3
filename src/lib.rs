// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Storecheck - Edge Gateway & Audits API
//!
//! This crate provides the trust boundary for the Storecheck platform: an
//! edge gateway that terminates Auth0 bearer tokens and an internal audits
//! API that trusts only the gateway-injected identity header.
//!
//! ## Modules
//!
//! - `auth` - Edge token verification (Auth0 JWT + JWKS)
//! - `gateway` - Edge router and upstream proxy
//! - `trust` - Internal trusted-header middleware and role gates
//! - `storage` - JSON-file user store
//! - `api` - Internal HTTP API handlers (Axum)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod state;
pub mod storage;
pub mod trust;
