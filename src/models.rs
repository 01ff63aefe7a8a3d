// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::repository::StoredUser;

/// Request body for the login endpoint.
///
/// The credential may arrive under either field name depending on which
/// provider the client integrated; the `Authorization` header works too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// ID token from a first-party OAuth or Supabase flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// ID token from a Firebase web flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_auth_token: Option<String>,
}

impl LoginRequest {
    /// The credential supplied in the body, whichever field carried it.
    pub fn credential(&self) -> Option<&str> {
        self.id_token
            .as_deref()
            .or(self.firebase_auth_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque access token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: UserResponse,
}

/// Public representation of a local user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Stable opaque identifier.
    pub id: String,
    /// Email asserted by the identity provider.
    pub email: String,
    /// Derived local username.
    pub username: String,
    /// First name, if known.
    pub first_name: String,
    /// Last name, if known.
    pub last_name: String,
    /// When the user last authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            last_login: user.last_login,
        }
    }
}
