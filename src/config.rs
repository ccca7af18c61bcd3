// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed configuration structs for both binaries. Configuration is loaded
//! eagerly at startup; a missing required variable is a startup error, never
//! a lazy per-request failure.
//!
//! ## Environment Variables (gateway)
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH0_JWKS_URL` | Auth0 JWKS endpoint for JWT verification | Required (unless built with `dev`) |
//! | `AUTH0_ISSUER` | Expected JWT issuer claim | Required |
//! | `AUTH0_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUDITS_API_URL` | Base URL of the internal audits API | Required |
//! | `UPSTREAM_TIMEOUT_SECS` | Per-request upstream timeout | `30` |
//!
//! ## Environment Variables (audits-api)
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the user store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8081` |
//! | `AUTO_PROVISION` | Create users on first verified request | `true` |
//! | `BOOTSTRAP_ADMIN` | Promote the first provisioned user to admin | `false` |
//!
//! ## Shared
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use url::Url;

use crate::trust::Role;

/// Environment variable name for the user store root directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default user store root directory.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the Auth0 JWKS endpoint.
pub const AUTH0_JWKS_URL_ENV: &str = "AUTH0_JWKS_URL";

/// Environment variable name for the expected JWT issuer.
pub const AUTH0_ISSUER_ENV: &str = "AUTH0_ISSUER";

/// Environment variable name for the expected JWT audience.
pub const AUTH0_AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";

/// Environment variable name for the internal audits API base URL.
pub const AUDITS_API_URL_ENV: &str = "AUDITS_API_URL";

/// Environment variable name for the upstream request timeout (seconds).
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";

/// Environment variable name for the auto-provisioning switch.
pub const AUTO_PROVISION_ENV: &str = "AUTO_PROVISION";

/// Environment variable name for the bootstrap-admin opt-in.
pub const BOOTSTRAP_ADMIN_ENV: &str = "BOOTSTRAP_ADMIN";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Default upstream request timeout.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Gateway (edge) configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Auth0 JWKS endpoint. `None` only in `dev` builds.
    pub jwks_url: Option<String>,
    /// Expected token issuer.
    pub issuer: String,
    /// Expected token audience.
    pub audience: String,
    /// Internal audits API base URL.
    pub audits_api_url: Url,
    /// Per-request upstream timeout.
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    /// Load the gateway configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwks_url = optional(AUTH0_JWKS_URL_ENV);

        // Without the dev feature a missing JWKS URL would mean accepting
        // unverifiable tokens, so refuse to start.
        #[cfg(not(feature = "dev"))]
        if jwks_url.is_none() {
            return Err(ConfigError::MissingVar(AUTH0_JWKS_URL_ENV));
        }

        let audits_api_url = required(AUDITS_API_URL_ENV)?;
        let audits_api_url =
            Url::parse(&audits_api_url).map_err(|e| ConfigError::InvalidVar {
                var: AUDITS_API_URL_ENV,
                reason: e.to_string(),
            })?;

        Ok(Self {
            host: host(),
            port: port(8080)?,
            jwks_url,
            issuer: required(AUTH0_ISSUER_ENV)?,
            audience: required(AUTH0_AUDIENCE_ENV)?,
            audits_api_url,
            upstream_timeout: upstream_timeout()?,
        })
    }
}

/// Audits API (internal) configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AuditsApiConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Root directory for the user store.
    pub data_dir: String,
    /// Whether unknown identities with a forwarded profile are provisioned.
    pub auto_provision: bool,
    /// Whether the first provisioned user is promoted to admin.
    pub bootstrap_admin: bool,
    /// Role assigned to newly provisioned users.
    pub default_role: Role,
}

impl AuditsApiConfig {
    /// Load the audits API configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: host(),
            port: port(8081)?,
            data_dir: optional(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            auto_provision: flag(AUTO_PROVISION_ENV, true)?,
            bootstrap_admin: flag(BOOTSTRAP_ADMIN_ENV, false)?,
            default_role: Role::Employee,
        })
    }
}

/// Initialize the tracing subscriber.
///
/// Honors `RUST_LOG` for filtering and `LOG_FORMAT` (`json` or `pretty`)
/// for output format. Safe to call once per process.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = optional(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::MissingVar(var))
}

fn optional(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn host() -> String {
    optional(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string())
}

fn port(default: u16) -> Result<u16, ConfigError> {
    match optional(PORT_ENV) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            var: PORT_ENV,
            reason: format!("not a valid port: {raw}"),
        }),
        None => Ok(default),
    }
}

fn upstream_timeout() -> Result<Duration, ConfigError> {
    match optional(UPSTREAM_TIMEOUT_ENV) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidVar {
                var: UPSTREAM_TIMEOUT_ENV,
                reason: format!("not a number of seconds: {raw}"),
            }),
        None => Ok(DEFAULT_UPSTREAM_TIMEOUT),
    }
}

fn flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match optional(var) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidVar {
                var,
                reason: format!("expected true/false, got {raw}"),
            }),
        },
        None => Ok(default),
    }
}
