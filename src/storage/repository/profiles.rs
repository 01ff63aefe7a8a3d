// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Provider profile repository.
//!
//! One profile per user, stored alongside the user record. The fixed
//! `profile.json` path inside the user directory is what enforces the
//! one-to-one relation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStorage, StorageError, StorageResult};

/// Provider-sourced mutable attributes for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredProfile {
    /// Display name as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Phone number as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Avatar URL as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Provider-assigned subject identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// When the profile was first created
    pub created_at: DateTime<Utc>,
    /// When the profile was last written
    pub updated_at: DateTime<Utc>,
}

/// Authority-specific defaults applied when a profile is first created.
///
/// Mirrors the per-authority creation hook: some authorities seed the
/// provider uid only, others also seed the avatar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSeed {
    pub uid: Option<String>,
    pub photo_url: Option<String>,
}

/// Repository for provider profiles.
pub struct ProfileRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new ProfileRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Get the profile for a user.
    pub fn get(&self, username: &str) -> StorageResult<StoredProfile> {
        let path = self.storage.paths().user_profile(username);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Profile for {username}")));
        }
        self.storage.read_json(path)
    }

    /// Find the profile for a user, creating it from the seed if absent.
    pub fn get_or_create(&self, username: &str, seed: &ProfileSeed) -> StorageResult<StoredProfile> {
        match self.get(username) {
            Ok(existing) => return Ok(existing),
            Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let now = Utc::now();
        let profile = StoredProfile {
            display_name: None,
            phone_number: None,
            photo_url: seed.photo_url.clone(),
            uid: seed.uid.clone(),
            created_at: now,
            updated_at: now,
        };

        match self
            .storage
            .create_json(self.storage.paths().user_profile(username), &profile)
        {
            Ok(()) => Ok(profile),
            // Lost the creation race; the existing profile wins.
            Err(StorageError::AlreadyExists(_)) => self.get(username),
            Err(e) => Err(e),
        }
    }

    /// Update the profile for a user.
    pub fn update(&self, username: &str, profile: &StoredProfile) -> StorageResult<()> {
        let path = self.storage.paths().user_profile(username);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Profile for {username}")));
        }
        self.storage.write_json(path, profile)
    }
}
