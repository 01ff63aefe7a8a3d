// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication entry point.
//!
//! Orchestrates the full sequence for one request: extract the credential,
//! route it, pre-check expiry, verify against the selected authority, and
//! reconcile the claims onto a local user. Only the `AuthError` taxonomy
//! crosses this boundary.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::AuthSettings;
use crate::storage::repository::{StoredUser, UserRepository};
use crate::storage::{FileStorage, StorageError};

use super::decoder;
use super::error::AuthError;
use super::jwks::JwksManager;
use super::reconciler::IdentityReconciler;
use super::router::{self, Route};
use super::verifier::{AuthorityVerifier, VerifierRegistry};

/// The authentication-relevant parts of an inbound request.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    /// Raw `Authorization` header value, if present
    pub authorization: Option<&'a str>,
    /// Credential delivered in the request body, if any
    pub body_token: Option<&'a str>,
    /// Request host (from the `Host` header)
    pub host: &'a str,
    /// Whether this call site treats a missing credential as an error
    pub require_credential: bool,
}

/// End-to-end authenticator for inbound requests.
pub struct Authenticator {
    settings: AuthSettings,
    verifiers: VerifierRegistry,
    storage: Arc<FileStorage>,
}

impl Authenticator {
    /// Create a new Authenticator.
    pub fn new(
        settings: AuthSettings,
        verifiers: VerifierRegistry,
        storage: Arc<FileStorage>,
    ) -> Self {
        Self {
            settings,
            verifiers,
            storage,
        }
    }

    /// The JWKS manager backing Firebase verification, when configured.
    pub fn firebase_jwks(&self) -> Option<&JwksManager> {
        match &self.verifiers.firebase {
            Some(AuthorityVerifier::Firebase(v)) => Some(v.jwks()),
            _ => None,
        }
    }

    /// Authenticate one inbound request.
    ///
    /// Returns the local user on success, `None` for a credential-less
    /// request at a call site that permits anonymous access, or a typed
    /// failure.
    pub async fn authenticate(
        &self,
        request: &AuthRequest<'_>,
    ) -> Result<Option<StoredUser>, AuthError> {
        let credential = router::extract_credential(request.authorization, request.body_token);

        match router::route(request.authorization, credential, request.host, &self.settings) {
            Route::Anonymous => {
                return if request.require_credential {
                    Err(AuthError::NoAuthToken)
                } else {
                    Ok(None)
                };
            }
            Route::DevBypass { username } => {
                debug!(%username, "dev bypass: resolving header value as local username");
                let users = UserRepository::new(&self.storage);
                let user = users.get(&username).map_err(|e| match e {
                    StorageError::NotFound(_) => AuthError::UserNotFound,
                    other => AuthError::Storage(other),
                })?;
                return Ok(Some(user));
            }
            Route::Credential => {}
        }

        let credential = credential.ok_or(AuthError::NoAuthToken)?;
        let unverified =
            decoder::decode_unverified(credential).map_err(|_| AuthError::InvalidAuthToken)?;

        // Cheap pre-check so an expired credential never costs a verifier
        // round-trip. The verifier still enforces expiry itself; this check
        // is not authoritative.
        if unverified.is_expired_at(Utc::now().timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        let authority = router::select_authority(&unverified, &self.settings)?;
        let verifier = self
            .verifiers
            .get(authority)
            .ok_or(AuthError::InvalidAuthToken)?;

        let claims = verifier.verify(credential, &unverified).await?;
        if claims.uid.is_none() {
            return Err(AuthError::FirebaseError(
                "verified claims carry no provider uid".to_string(),
            ));
        }

        let seed = verifier.profile_seed(&claims);
        let reconciler = IdentityReconciler::new(&self.storage);
        let user = reconciler.reconcile(&claims, &seed)?;

        debug!(user_id = %user.id, username = %user.username, "authenticated");
        Ok(Some(user))
    }
}
