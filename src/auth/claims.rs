// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! JWT claims and the verified identity carried through the edge.

use serde::Deserialize;

/// Claims decoded from an Auth0 access token.
///
/// Auth0 tokens carry the standard OIDC claims; `email` and `name` are only
/// present when the corresponding scopes were granted.
#[derive(Debug, Clone, Deserialize)]
pub struct Auth0Claims {
    /// Subject - the canonical Auth0 user identifier (e.g. `auth0|abc123`).
    pub sub: String,

    /// Issued at timestamp.
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp.
    #[serde(default)]
    pub exp: i64,

    /// Issuer (the Auth0 tenant URL).
    #[serde(default)]
    pub iss: String,

    /// Audience. Auth0 emits either a string or an array; validation is
    /// performed by the jsonwebtoken crate, not read directly.
    #[serde(default)]
    #[allow(dead_code)]
    pub aud: Option<serde_json::Value>,

    /// Authorized party (optional).
    #[serde(default)]
    pub azp: Option<String>,

    /// Email address (requires the `email` scope).
    #[serde(default)]
    pub email: Option<String>,

    /// Display name (requires the `profile` scope).
    #[serde(default)]
    pub name: Option<String>,
}

/// Identity established by edge verification.
///
/// This is what the gateway attaches to the request after a token passes
/// verification, and the source of the forwarded trusted headers. It carries
/// no role: roles live on the local user record inside the trust boundary.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Subject claim, forwarded as `x-user-id`.
    pub subject: String,
    /// Verified email, forwarded as `x-user-email` when present.
    pub email: Option<String>,
    /// Verified display name, forwarded as `x-user-name` when present.
    pub name: Option<String>,
    /// Original issuer (kept for logging).
    pub issuer: String,
    /// Token expiration (Unix timestamp, kept for logging).
    pub expires_at: i64,
}

impl VerifiedIdentity {
    /// Build from decoded claims.
    pub fn from_claims(claims: Auth0Claims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Auth0Claims {
        Auth0Claims {
            sub: "auth0|abc123".to_string(),
            iat: 1700000000,
            exp: 1700003600,
            iss: "https://storecheck.eu.auth0.com/".to_string(),
            aud: Some(serde_json::json!("https://api.storecheck.example")),
            azp: None,
            email: Some("rita@example.com".to_string()),
            name: Some("Rita".to_string()),
        }
    }

    #[test]
    fn from_claims_extracts_subject_and_profile() {
        let identity = VerifiedIdentity::from_claims(sample_claims());
        assert_eq!(identity.subject, "auth0|abc123");
        assert_eq!(identity.email.as_deref(), Some("rita@example.com"));
        assert_eq!(identity.name.as_deref(), Some("Rita"));
    }

    #[test]
    fn profile_claims_are_optional() {
        let mut claims = sample_claims();
        claims.email = None;
        claims.name = None;

        let identity = VerifiedIdentity::from_claims(claims);
        assert!(identity.email.is_none());
        assert!(identity.name.is_none());
    }

    #[test]
    fn audience_deserializes_from_string_or_array() {
        let json = r#"{"sub":"auth0|1","aud":["a","b"],"iss":"i"}"#;
        let claims: Auth0Claims = serde_json::from_str(json).unwrap();
        assert!(claims.aud.is_some());

        let json = r#"{"sub":"auth0|1","aud":"a","iss":"i"}"#;
        let claims: Auth0Claims = serde_json::from_str(json).unwrap();
        assert!(claims.aud.is_some());
    }
}
