// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supabase Auth verification via the project's user endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::auth::claims::{AuthenticatedClaims, UnverifiedClaims};
use crate::auth::error::AuthError;
use crate::auth::verifier::VerifyToken;
use crate::config::SupabaseSettings;
use crate::storage::repository::ProfileSeed;

/// Verifier for Supabase access tokens.
///
/// The project's `/auth/v1/user` endpoint only answers for tokens it issued
/// and still considers valid, so a successful lookup is the verification.
#[derive(Debug, Clone)]
pub struct SupabaseVerifier {
    base_url: String,
    anon_key: String,
    http: Client,
}

/// User record returned by the Supabase auth endpoint.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    user_metadata: Map<String, Value>,
}

impl SupabaseVerifier {
    /// Create a new verifier from Supabase settings.
    pub fn new(settings: &SupabaseSettings) -> Self {
        Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn metadata_str(user: &SupabaseUser, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|k| user.user_metadata.get(*k).and_then(Value::as_str))
            .map(str::to_string)
    }
}

impl VerifyToken for SupabaseVerifier {
    async fn verify(
        &self,
        credential: &str,
        _unverified: &UnverifiedClaims,
    ) -> Result<AuthenticatedClaims, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "user endpoint rejected credential");
            return Err(AuthError::InvalidAuthToken);
        }

        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidAuthToken)?;

        let email = user
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::InvalidAuthToken)?;

        Ok(AuthenticatedClaims {
            email,
            uid: Some(user.id.clone()),
            name: Self::metadata_str(&user, &["name", "full_name"]),
            picture: Self::metadata_str(&user, &["avatar_url", "picture"]),
            phone_number: user.phone.clone().filter(|p| !p.is_empty()),
        })
    }

    fn profile_seed(&self, claims: &AuthenticatedClaims) -> ProfileSeed {
        ProfileSeed {
            uid: claims.uid.clone(),
            photo_url: claims.picture.clone(),
        }
    }
}
