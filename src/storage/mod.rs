// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Identity Store Module
//!
//! File-backed persistence for local users, their provider profiles, and
//! issued access tokens.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/{username}/
//!     user.json       # Identity record (email, username, names, last_login)
//!     profile.json    # Provider profile (display name, phone, avatar, uid)
//!   tokens/
//!     {token}.json    # Issued opaque access tokens
//! ```
//!
//! ## Consistency
//!
//! Records are written atomically (temp file + rename), and first inserts
//! use exclusive creation so duplicate-key races resolve inside the
//! filesystem rather than in application code.

pub mod fs;
pub mod paths;
pub mod repository;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    AccessTokenRepository, ProfileRepository, ProfileSeed, StoredAccessToken, StoredProfile,
    StoredUser, UserRepository,
};
