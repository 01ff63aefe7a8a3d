// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the identity store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the FileStorage for all file operations.

pub mod profiles;
pub mod tokens;
pub mod users;

pub use profiles::{ProfileRepository, ProfileSeed, StoredProfile};
pub use tokens::{AccessTokenRepository, StoredAccessToken};
pub use users::{StoredUser, UserRepository};
