// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::storage::FileStorage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStorage>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(storage: Arc<FileStorage>, authenticator: Authenticator) -> Self {
        Self {
            storage,
            authenticator: Arc::new(authenticator),
        }
    }
}
