// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, HOST},
        HeaderMap,
    },
    Json,
};
use tracing::info;

use crate::auth::{AuthError, AuthRequest};
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;
use crate::storage::repository::AccessTokenRepository;

/// Authenticate a provider credential and issue an opaque access token.
///
/// The credential is taken from the body (`id_token` or
/// `firebase_auth_token`) or the `Authorization` header. Repeated logins
/// for the same user return the same token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Missing, invalid, or expired credential"),
        (status = 500, description = "Provider integration or storage failure"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let auth_request = AuthRequest {
        authorization: headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
        body_token: request.credential(),
        host: headers.get(HOST).and_then(|v| v.to_str().ok()).unwrap_or(""),
        require_credential: true,
    };

    let user = state
        .authenticator
        .authenticate(&auth_request)
        .await?
        .ok_or(AuthError::NoAuthToken)?;

    let tokens = AccessTokenRepository::new(&state.storage);
    let access = tokens.issue_for(&user)?;

    info!(user_id = %user.id, username = %user.username, "login succeeded");
    Ok(Json(LoginResponse {
        token: access.token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::AuthenticatedClaims;
    use crate::auth::entry::Authenticator;
    use crate::auth::verifier::{AuthorityVerifier, StaticVerifier, VerifierRegistry};
    use crate::config::AuthSettings;
    use crate::storage::repository::UserRepository;
    use crate::storage::{FileStorage, StoragePaths};
    use axum::http::{HeaderValue, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize storage");
        let storage = Arc::new(storage);

        let settings = AuthSettings {
            debug: true,
            dev_hosts: vec!["localhost".to_string()],
            first_party: None,
            firebase: None,
            supabase: None,
        };
        let registry = VerifierRegistry {
            first_party: Some(AuthorityVerifier::Static(StaticVerifier::returning(
                AuthenticatedClaims {
                    email: "a@x.com".to_string(),
                    uid: Some("uid-1".to_string()),
                    name: None,
                    picture: None,
                    phone_number: None,
                },
            ))),
            firebase: None,
            supabase: None,
        };
        let authenticator = Authenticator::new(settings, registry, Arc::clone(&storage));
        (AppState::new(storage, authenticator), temp_dir)
    }

    fn dev_headers(username: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(username).unwrap());
        headers.insert(HOST, HeaderValue::from_static("localhost"));
        headers
    }

    #[tokio::test]
    async fn login_without_credential_is_unauthorized() {
        let (state, _temp_dir) = test_state();

        let result = login(
            State(state),
            HeaderMap::new(),
            Json(LoginRequest::default()),
        )
        .await;

        match result {
            Err(err) => assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED),
            Ok(_) => panic!("expected unauthorized"),
        }
    }

    #[tokio::test]
    async fn login_issues_stable_token() {
        let (state, _temp_dir) = test_state();
        let users = UserRepository::new(&state.storage);
        users.get_or_create("alice@example.com", "alice").unwrap();

        let Json(first) = login(
            State(state.clone()),
            dev_headers("alice"),
            Json(LoginRequest::default()),
        )
        .await
        .expect("login succeeds");

        assert_eq!(first.user.username, "alice");
        assert!(!first.token.is_empty());

        let Json(second) = login(
            State(state),
            dev_headers("alice"),
            Json(LoginRequest::default()),
        )
        .await
        .expect("second login succeeds");

        assert_eq!(first.token, second.token);
    }
}
