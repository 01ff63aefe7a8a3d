// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use relational_auth_bridge::{
    api::router,
    auth::{Authenticator, VerifierRegistry},
    config::{AuthSettings, DATA_DIR_ENV},
    state::AppState,
    storage::{FileStorage, StoragePaths},
};

#[tokio::main]
async fn main() {
    init_tracing();

    let settings = AuthSettings::from_env().expect("Invalid authentication settings");

    let paths = match env::var(DATA_DIR_ENV) {
        Ok(dir) => StoragePaths::new(&dir),
        Err(_) => StoragePaths::default(),
    };
    let mut storage = FileStorage::new(paths);
    storage
        .initialize()
        .expect("Failed to initialize identity store");
    let storage = Arc::new(storage);

    let verifiers = VerifierRegistry::from_settings(&settings);
    let authenticator = Authenticator::new(settings, verifiers, Arc::clone(&storage));
    let state = AppState::new(storage, authenticator);
    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "Auth bridge listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
