// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{LoginRequest, LoginResponse, UserResponse},
    state::AppState,
};

pub mod health;
pub mod login;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/login", post(login::login))
        .route("/users/me", get(users::get_current_user));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::login,
        users::get_current_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Credential verification and login"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Health", description = "Service health and readiness")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::entry::Authenticator;
    use crate::auth::verifier::VerifierRegistry;
    use crate::config::AuthSettings;
    use crate::storage::{FileStorage, StoragePaths};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize storage");
        let storage = Arc::new(storage);

        let settings = AuthSettings {
            debug: false,
            dev_hosts: vec![],
            first_party: None,
            firebase: None,
            supabase: None,
        };
        let authenticator =
            Authenticator::new(settings, VerifierRegistry::default(), Arc::clone(&storage));
        (AppState::new(storage, authenticator), temp_dir)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _temp_dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
