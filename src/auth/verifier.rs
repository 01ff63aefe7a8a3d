// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Polymorphic token verification over trust authorities.
//!
//! Each authority implements [`VerifyToken`]; the configured set is held in
//! a [`VerifierRegistry`] and dispatched through [`AuthorityVerifier`], so
//! authorities stay independently constructible and testable.

use crate::config::AuthSettings;
use crate::providers::{FirebaseVerifier, GoogleVerifier, SupabaseVerifier};
use crate::storage::repository::ProfileSeed;

use super::claims::{AuthenticatedClaims, UnverifiedClaims};
use super::error::AuthError;
use super::router::Authority;

/// Verification capability of a single trust authority.
pub(crate) trait VerifyToken {
    /// Verify the credential and return authenticated claims.
    ///
    /// Every provider-side failure is translated to `InvalidAuthToken`;
    /// nothing else escapes this layer.
    async fn verify(
        &self,
        credential: &str,
        unverified: &UnverifiedClaims,
    ) -> Result<AuthenticatedClaims, AuthError>;

    /// Authority-specific defaults applied when a profile is first created.
    fn profile_seed(&self, claims: &AuthenticatedClaims) -> ProfileSeed;
}

/// A configured verifier for one authority.
pub enum AuthorityVerifier {
    FirstParty(GoogleVerifier),
    Firebase(FirebaseVerifier),
    Supabase(SupabaseVerifier),
    #[cfg(test)]
    Static(StaticVerifier),
}

impl AuthorityVerifier {
    /// Verify a credential against this authority.
    pub async fn verify(
        &self,
        credential: &str,
        unverified: &UnverifiedClaims,
    ) -> Result<AuthenticatedClaims, AuthError> {
        match self {
            AuthorityVerifier::FirstParty(v) => v.verify(credential, unverified).await,
            AuthorityVerifier::Firebase(v) => v.verify(credential, unverified).await,
            AuthorityVerifier::Supabase(v) => v.verify(credential, unverified).await,
            #[cfg(test)]
            AuthorityVerifier::Static(v) => v.verify(credential, unverified).await,
        }
    }

    /// Profile defaults for a first-time authentication.
    pub fn profile_seed(&self, claims: &AuthenticatedClaims) -> ProfileSeed {
        match self {
            AuthorityVerifier::FirstParty(v) => v.profile_seed(claims),
            AuthorityVerifier::Firebase(v) => v.profile_seed(claims),
            AuthorityVerifier::Supabase(v) => v.profile_seed(claims),
            #[cfg(test)]
            AuthorityVerifier::Static(v) => v.profile_seed(claims),
        }
    }
}

/// The set of verifiers this deployment is configured with.
#[derive(Default)]
pub struct VerifierRegistry {
    pub first_party: Option<AuthorityVerifier>,
    pub firebase: Option<AuthorityVerifier>,
    pub supabase: Option<AuthorityVerifier>,
}

impl VerifierRegistry {
    /// Build verifiers for every authority the settings configure.
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            first_party: settings
                .first_party
                .as_ref()
                .map(|s| AuthorityVerifier::FirstParty(GoogleVerifier::new(s))),
            firebase: settings
                .firebase
                .as_ref()
                .map(|s| AuthorityVerifier::Firebase(FirebaseVerifier::new(s))),
            supabase: settings
                .supabase
                .as_ref()
                .map(|s| AuthorityVerifier::Supabase(SupabaseVerifier::new(s))),
        }
    }

    /// The verifier for an authority, if configured.
    pub fn get(&self, authority: Authority) -> Option<&AuthorityVerifier> {
        match authority {
            Authority::FirstParty => self.first_party.as_ref(),
            Authority::Firebase => self.firebase.as_ref(),
            Authority::Supabase => self.supabase.as_ref(),
        }
    }
}

/// Canned verifier for exercising the entry point without network calls.
#[cfg(test)]
pub struct StaticVerifier {
    claims: AuthenticatedClaims,
    seed: ProfileSeed,
    calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl StaticVerifier {
    pub fn returning(claims: AuthenticatedClaims) -> Self {
        Self {
            claims,
            seed: ProfileSeed::default(),
            calls: std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    pub fn with_seed(mut self, seed: ProfileSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn call_counter(&self) -> std::sync::Arc<std::sync::atomic::AtomicUsize> {
        std::sync::Arc::clone(&self.calls)
    }
}

#[cfg(test)]
impl VerifyToken for StaticVerifier {
    async fn verify(
        &self,
        _credential: &str,
        _unverified: &UnverifiedClaims,
    ) -> Result<AuthenticatedClaims, AuthError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.claims.clone())
    }

    fn profile_seed(&self, _claims: &AuthenticatedClaims) -> ProfileSeed {
        self.seed.clone()
    }
}
