// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Authentication error type.
///
/// This is the complete set of failures the entry point lets cross the
/// boundary; decoder, router, and verifier failures are normalized to one
/// of these variants before surfacing.
#[derive(Debug)]
pub enum AuthError {
    /// No credential supplied where one is required
    NoAuthToken,
    /// Malformed token, failed verification, or unroutable authority hint
    InvalidAuthToken,
    /// Token expiry lies in the past
    TokenExpired,
    /// Dev bypass referenced a username with no matching local user
    UserNotFound,
    /// Verified claims from a misconfigured or non-conforming provider
    FirebaseError(String),
    /// Persistence failure, passed through unrecovered
    Storage(StorageError),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoAuthToken => "no_auth_token",
            AuthError::InvalidAuthToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::UserNotFound => "user_not_found",
            AuthError::FirebaseError(_) => "no_firebase_uid",
            AuthError::Storage(_) => "storage_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoAuthToken
            | AuthError::InvalidAuthToken
            | AuthError::TokenExpired
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::FirebaseError(_) | AuthError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NoAuthToken => write!(f, "No authentication token provided"),
            AuthError::InvalidAuthToken => write!(f, "Invalid authentication token provided"),
            AuthError::TokenExpired => write!(f, "Authorization token is expired"),
            AuthError::UserNotFound => write!(f, "No local user matches the provided username"),
            AuthError::FirebaseError(msg) => write!(f, "Identity provider error: {msg}"),
            AuthError::Storage(e) => write!(f, "Identity store error: {e}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Storage(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
