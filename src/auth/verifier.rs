// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Token verifier constructed eagerly at gateway startup.
//!
//! Configuration is loaded before the server binds, so there is no lazy
//! global: the verifier exists (or startup has failed) before the first
//! request arrives.
//!
//! ## Verification Modes
//!
//! - **Production** (AUTH0_JWKS_URL set): full signature verification
//!   against the provider JWKS, plus issuer, audience, and expiry checks
//! - **Development** (`dev` feature, no JWKS URL): structure and expiry
//!   validation only, no signature check

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Validation};

use super::claims::Auth0Claims;
use super::jwks::JwksManager;
use super::{AuthError, VerifiedIdentity};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Verifies bearer tokens at the edge.
#[derive(Clone)]
pub struct TokenVerifier {
    /// JWKS manager; `None` only in `dev` builds.
    jwks: Option<Arc<JwksManager>>,
    /// Expected issuer (Auth0 tenant URL).
    issuer: String,
    /// Expected audience.
    audience: String,
}

impl TokenVerifier {
    /// Create a production verifier backed by a JWKS endpoint.
    pub fn new(
        jwks: JwksManager,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            jwks: Some(Arc::new(jwks)),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Create a development verifier that skips signature verification.
    ///
    /// Only available with the `dev` feature, which must never be enabled
    /// in production builds.
    #[cfg(feature = "dev")]
    pub fn insecure(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks: None,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Expected issuer.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Verify a bearer token and return the established identity.
    pub async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        match &self.jwks {
            Some(jwks) => self.verify_signed(token, jwks).await,
            None => {
                #[cfg(feature = "dev")]
                {
                    self.verify_insecure(token)
                }
                #[cfg(not(feature = "dev"))]
                {
                    Err(AuthError::InternalError(
                        "JWKS not configured".to_string(),
                    ))
                }
            }
        }
    }

    /// Full JWT verification against the provider JWKS.
    async fn verify_signed(
        &self,
        token: &str,
        jwks: &JwksManager,
    ) -> Result<VerifiedIdentity, AuthError> {
        // Decode header to get kid (key ID)
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        // Get decoding key from JWKS
        let (decoding_key, algorithm) = if let Some(kid) = &header.kid {
            jwks.get_decoding_key(kid).await?
        } else {
            // No kid in header, try any key
            jwks.get_any_decoding_key().await?
        };

        // Build validation
        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        // Decode and validate token
        let token_data =
            decode::<Auth0Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(VerifiedIdentity::from_claims(token_data.claims))
    }

    /// Development verification (no signature check).
    ///
    /// WARNING: structure and expiry validation only.
    #[cfg(feature = "dev")]
    fn verify_insecure(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let token_data = jsonwebtoken::dangerous::insecure_decode::<Auth0Claims>(token)
            .map_err(|_| AuthError::MalformedToken)?;

        let claims = token_data.claims;

        // Check expiration manually
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
            return Err(AuthError::TokenExpired);
        }

        Ok(VerifiedIdentity::from_claims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production_verifier() -> TokenVerifier {
        TokenVerifier::new(
            JwksManager::new("https://example.auth0.com/.well-known/jwks.json"),
            "https://example.auth0.com/",
            "https://api.storecheck.example",
        )
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_as_malformed() {
        // decode_header fails before any JWKS fetch, so no network needed.
        let verifier = production_verifier();
        let result = verifier.verify("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[test]
    fn issuer_is_exposed_for_logging() {
        let verifier = production_verifier();
        assert_eq!(verifier.issuer(), "https://example.auth0.com/");
    }

    #[cfg(feature = "dev")]
    mod dev_mode {
        use super::*;
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        /// Hand-built unsigned JWT, accepted only by the dev verifier.
        fn test_jwt(sub: &str, exp: i64) -> String {
            let header = r#"{"alg":"RS256","typ":"JWT"}"#;
            let claims = format!(
                r#"{{"sub":"{sub}","iat":1609459200,"exp":{exp},"iss":"https://example.auth0.com/","email":"t@example.com"}}"#
            );
            let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
            let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());
            format!("{header_b64}.{claims_b64}.unsigned")
        }

        #[tokio::test]
        async fn insecure_verifier_extracts_identity() {
            let verifier = TokenVerifier::insecure("https://example.auth0.com/", "aud");
            let identity = verifier.verify(&test_jwt("auth0|dev1", 9999999999)).await.unwrap();
            assert_eq!(identity.subject, "auth0|dev1");
            assert_eq!(identity.email.as_deref(), Some("t@example.com"));
        }

        #[tokio::test]
        async fn insecure_verifier_still_checks_expiry() {
            let verifier = TokenVerifier::insecure("https://example.auth0.com/", "aud");
            let result = verifier.verify(&test_jwt("auth0|dev1", 1000)).await;
            assert!(matches!(result, Err(AuthError::TokenExpired)));
        }
    }
}
