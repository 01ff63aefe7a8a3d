// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Firebase ID token verification.
//!
//! Verifies the RS256 signature against the securetoken JWKS, pins the
//! issuer and audience to the configured project, and optionally checks
//! revocation through the identitytoolkit account lookup.

use std::time::Duration;

use jsonwebtoken::{decode, decode_header, Validation};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::auth::claims::{AuthenticatedClaims, UnverifiedClaims};
use crate::auth::error::AuthError;
use crate::auth::jwks::JwksManager;
use crate::auth::verifier::VerifyToken;
use crate::config::FirebaseSettings;
use crate::storage::repository::ProfileSeed;

/// Clock skew tolerance between this service and the token issuer.
const CLOCK_SKEW_LEEWAY_SECS: u64 = 5;

const ACCOUNTS_LOOKUP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

/// Verifier for Firebase Authentication ID tokens.
#[derive(Clone)]
pub struct FirebaseVerifier {
    project_id: String,
    issuer: String,
    jwks: JwksManager,
    check_revoked: bool,
    api_key: Option<String>,
    http: Client,
}

/// Claims carried by a Firebase ID token.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    iat: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(default, rename = "validSince")]
    valid_since: Option<String>,
}

impl FirebaseVerifier {
    /// Create a new verifier from Firebase settings.
    pub fn new(settings: &FirebaseSettings) -> Self {
        Self {
            project_id: settings.project_id.clone(),
            issuer: settings.issuer(),
            jwks: JwksManager::new(&settings.jwks_url),
            check_revoked: settings.check_revoked,
            api_key: settings.api_key.clone(),
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// The JWKS manager backing signature verification.
    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Reject tokens issued before the account's tokens were invalidated.
    async fn ensure_not_revoked(&self, credential: &str, issued_at: i64) -> Result<(), AuthError> {
        let Some(api_key) = &self.api_key else {
            return Ok(());
        };

        let response = self
            .http
            .post(ACCOUNTS_LOOKUP_URL)
            .query(&[("key", api_key.as_str())])
            .json(&serde_json::json!({ "idToken": credential }))
            .send()
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "account lookup rejected credential");
            return Err(AuthError::InvalidAuthToken);
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;
        let user = lookup.users.first().ok_or(AuthError::InvalidAuthToken)?;

        if let Some(valid_since) = user
            .valid_since
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
        {
            if issued_at < valid_since {
                warn!("credential was issued before the account's tokens were revoked");
                return Err(AuthError::InvalidAuthToken);
            }
        }

        Ok(())
    }
}

impl VerifyToken for FirebaseVerifier {
    async fn verify(
        &self,
        credential: &str,
        _unverified: &UnverifiedClaims,
    ) -> Result<AuthenticatedClaims, AuthError> {
        let header = decode_header(credential).map_err(|_| AuthError::InvalidAuthToken)?;
        let kid = header.kid.ok_or(AuthError::InvalidAuthToken)?;

        let (decoding_key, algorithm) = self
            .jwks
            .get_decoding_key(&kid)
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.project_id]);

        let token_data = decode::<IdTokenClaims>(credential, &decoding_key, &validation)
            .map_err(|e| {
                warn!(error = %e, "ID token rejected");
                AuthError::InvalidAuthToken
            })?;
        let claims = token_data.claims;

        if self.check_revoked {
            self.ensure_not_revoked(credential, claims.iat).await?;
        }

        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::InvalidAuthToken)?;

        Ok(AuthenticatedClaims {
            email,
            uid: if claims.sub.is_empty() {
                None
            } else {
                Some(claims.sub)
            },
            name: claims.name,
            picture: claims.picture,
            phone_number: claims.phone_number,
        })
    }

    fn profile_seed(&self, claims: &AuthenticatedClaims) -> ProfileSeed {
        ProfileSeed {
            uid: claims.uid.clone(),
            photo_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_verifier(check_revoked: bool) -> FirebaseVerifier {
        FirebaseVerifier::new(&FirebaseSettings {
            project_id: "my-project".to_string(),
            jwks_url: "https://example.com/jwks".to_string(),
            check_revoked,
            api_key: check_revoked.then(|| "key".to_string()),
        })
    }

    #[test]
    fn issuer_is_pinned_to_project() {
        let verifier = test_verifier(false);
        assert_eq!(verifier.issuer, "https://securetoken.google.com/my-project");
        assert_eq!(verifier.project_id, "my-project");
    }

    #[tokio::test]
    async fn revocation_check_without_key_is_a_no_op() {
        let mut verifier = test_verifier(false);
        verifier.api_key = None;
        verifier
            .ensure_not_revoked("token", 0)
            .await
            .expect("no lookup without an api key");
    }

    #[test]
    fn lookup_response_parses_valid_since() {
        let lookup: LookupResponse =
            serde_json::from_str(r#"{"users":[{"validSince":"1700000000","localId":"u1"}]}"#)
                .unwrap();
        assert_eq!(
            lookup.users[0].valid_since.as_deref(),
            Some("1700000000")
        );
    }
}
