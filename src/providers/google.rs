// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! First-party OAuth verification via the Google tokeninfo endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::auth::claims::{AuthenticatedClaims, UnverifiedClaims};
use crate::auth::error::AuthError;
use crate::auth::verifier::VerifyToken;
use crate::config::FirstPartySettings;
use crate::storage::repository::ProfileSeed;

/// Verifier for first-party OAuth ID tokens.
///
/// Delegates signature and expiry checks to the tokeninfo endpoint; the
/// bridge only confirms the audience matches what the credential itself
/// announced.
#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    tokeninfo_url: String,
    http: Client,
}

/// Claims returned by the tokeninfo endpoint for a valid token.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl GoogleVerifier {
    /// Create a new verifier from first-party settings.
    pub fn new(settings: &FirstPartySettings) -> Self {
        Self {
            tokeninfo_url: settings.tokeninfo_url.clone(),
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl VerifyToken for GoogleVerifier {
    async fn verify(
        &self,
        credential: &str,
        unverified: &UnverifiedClaims,
    ) -> Result<AuthenticatedClaims, AuthError> {
        let audience = unverified.audience().ok_or(AuthError::InvalidAuthToken)?;

        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "tokeninfo endpoint rejected credential");
            return Err(AuthError::InvalidAuthToken);
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;

        if info.aud != audience {
            warn!("tokeninfo audience does not match credential audience");
            return Err(AuthError::InvalidAuthToken);
        }

        let email = info
            .email
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::InvalidAuthToken)?;

        Ok(AuthenticatedClaims {
            email,
            uid: info.sub.filter(|s| !s.is_empty()),
            name: info.name,
            picture: info.picture,
            phone_number: None,
        })
    }

    fn profile_seed(&self, claims: &AuthenticatedClaims) -> ProfileSeed {
        ProfileSeed {
            uid: claims.uid.clone(),
            photo_url: None,
        }
    }
}
