// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is the reconciled local StoredUser
//! }
//! ```
//!
//! `OptionalAuth` lets credential-less requests through as `None`; a
//! credential that is present but bad still fails.

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, HOST},
        request::Parts,
    },
};

use crate::state::AppState;
use crate::storage::repository::StoredUser;

use super::entry::AuthRequest;
use super::error::AuthError;

/// Extractor for requests that must be authenticated.
pub struct Auth(pub StoredUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let request = auth_request(parts, true);
        let user = state
            .authenticator
            .authenticate(&request)
            .await?
            .ok_or(AuthError::NoAuthToken)?;
        Ok(Auth(user))
    }
}

/// Optional authentication: anonymous requests pass through as `None`.
pub struct OptionalAuth(pub Option<StoredUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let request = auth_request(parts, false);
        let user = state.authenticator.authenticate(&request).await?;
        Ok(OptionalAuth(user))
    }
}

fn auth_request<'a>(parts: &'a Parts, require_credential: bool) -> AuthRequest<'a> {
    AuthRequest {
        authorization: parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
        body_token: None,
        host: parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(""),
        require_credential,
    }
}
