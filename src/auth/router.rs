// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authority routing for inbound credentials.
//!
//! Decides, from the raw `Authorization` value, the extracted credential,
//! and the unverified claims, which path a request takes: anonymous, the
//! development-only username bypass, or verification against one of the
//! configured trust authorities. First match wins.

use crate::config::AuthSettings;

use super::claims::UnverifiedClaims;
use super::error::AuthError;

/// A trust authority capable of verifying a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// First-party OAuth issuer
    FirstParty,
    /// Firebase Authentication
    Firebase,
    /// Supabase Auth
    Supabase,
}

/// Pre-verification route for an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// No credential supplied; anonymous unless the call site requires one.
    Anonymous,
    /// Dev-host bypass: the raw header names a local username directly.
    DevBypass { username: String },
    /// A credential is present and must be decoded, routed, and verified.
    Credential,
}

/// Extract the credential from the body field or the `Authorization` header.
///
/// The body field wins; the header falls back to its last whitespace-separated
/// segment, so both `Bearer <token>` and a bare token work.
pub fn extract_credential<'a>(
    authorization: Option<&'a str>,
    body_token: Option<&'a str>,
) -> Option<&'a str> {
    body_token
        .filter(|t| !t.is_empty())
        .or_else(|| authorization.and_then(|h| h.split_whitespace().last()))
}

/// Decide the pre-token route for a request.
pub fn route(
    authorization: Option<&str>,
    credential: Option<&str>,
    host: &str,
    settings: &AuthSettings,
) -> Route {
    if authorization.is_none() && credential.is_none() {
        return Route::Anonymous;
    }

    // Development-only bypass: a non-Bearer header on a dev host is a plain
    // local username, verified against nothing.
    if let Some(header) = authorization {
        if settings.debug && is_dev_host(host, &settings.dev_hosts) && !header.starts_with("Bearer ")
        {
            return Route::DevBypass {
                username: header.to_string(),
            };
        }
    }

    Route::Credential
}

fn is_dev_host(host: &str, dev_hosts: &[String]) -> bool {
    dev_hosts
        .iter()
        .any(|dev| host == dev || host.strip_prefix(dev.as_str()).is_some_and(|rest| rest.starts_with(':')))
}

/// Select the authority that must verify a decoded credential.
///
/// Fails with `InvalidAuthToken` when no configured authority recognizes
/// the claims.
pub fn select_authority(
    claims: &UnverifiedClaims,
    settings: &AuthSettings,
) -> Result<Authority, AuthError> {
    let issuer = claims.iss.as_deref();

    if let Some(first_party) = &settings.first_party {
        if issuer.is_some_and(|iss| first_party.issuers.iter().any(|i| i == iss)) {
            return Ok(Authority::FirstParty);
        }
    }

    if let Some(firebase) = &settings.firebase {
        if issuer == Some(firebase.issuer().as_str()) {
            return Ok(Authority::Firebase);
        }
    }

    if let Some(supabase) = &settings.supabase {
        let issuer_matches = issuer.is_some_and(|iss| iss.starts_with(supabase.url.as_str()));
        if issuer_matches || claims.audience() == Some("authenticated") {
            return Ok(Authority::Supabase);
        }
    }

    Err(AuthError::InvalidAuthToken)
}
