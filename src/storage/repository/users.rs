// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! ## Storage Layout
//!
//! Each user lives in its own directory, keyed by the derived username:
//! ```text
//! /data/users/{username}/
//!   user.json       # Identity record
//!   profile.json    # Provider-sourced profile (see profiles.rs)
//! ```
//!
//! The username is a deterministic function of the email, so the directory
//! key doubles as the uniqueness constraint on both columns: two concurrent
//! first-time inserts for the same email race on the same `user.json` and
//! exactly one create succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{FileStorage, StorageError, StorageResult};

/// A local user identity record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    /// Stable opaque identifier (UUID)
    pub id: String,
    /// Email asserted by the identity provider (unique)
    pub email: String,
    /// Derived local username (unique)
    pub username: String,
    /// First name, from the provider display name
    #[serde(default)]
    pub first_name: String,
    /// Last name, from the provider display name
    #[serde(default)]
    pub last_name: String,
    /// When the user was first created
    pub created_at: DateTime<Utc>,
    /// When the user last authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Repository for user records.
pub struct UserRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a user exists.
    pub fn exists(&self, username: &str) -> bool {
        self.storage
            .exists(self.storage.paths().user_record(username))
    }

    /// Get a user by username.
    pub fn get(&self, username: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user_record(username);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {username}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new user.
    ///
    /// # Returns
    /// - `Ok(())` if successful
    /// - `Err(StorageError::AlreadyExists)` if the username is taken
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        self.storage
            .create_json(self.storage.paths().user_record(&user.username), user)
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    StorageError::AlreadyExists(format!("User {}", user.username))
                }
                other => other,
            })
    }

    /// Update an existing user.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.username) {
            return Err(StorageError::NotFound(format!("User {}", user.username)));
        }
        self.storage
            .write_json(self.storage.paths().user_record(&user.username), user)
    }

    /// Find the user for an email, creating it if absent.
    ///
    /// Returns the user and whether it was created by this call. A lost
    /// creation race is absorbed by re-reading the winner's record. A
    /// username collision across distinct emails (digest collision) is
    /// surfaced as `AlreadyExists` and left to the caller.
    pub fn get_or_create(&self, email: &str, username: &str) -> StorageResult<(StoredUser, bool)> {
        match self.get(username) {
            Ok(existing) => {
                if existing.email != email {
                    return Err(StorageError::AlreadyExists(format!(
                        "Username {username} belongs to a different email"
                    )));
                }
                return Ok((existing, false));
            }
            Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now(),
            last_login: None,
        };

        match self.create(&user) {
            Ok(()) => Ok((user, true)),
            Err(StorageError::AlreadyExists(_)) => {
                // Lost the insert race; the winner's record is authoritative.
                let existing = self.get(username)?;
                if existing.email != email {
                    return Err(StorageError::AlreadyExists(format!(
                        "Username {username} belongs to a different email"
                    )));
                }
                Ok((existing, false))
            }
            Err(e) => Err(e),
        }
    }

    /// List all usernames.
    pub fn list_usernames(&self) -> StorageResult<Vec<String>> {
        self.storage.list_dirs(self.storage.paths().users_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize");
        (storage, temp_dir)
    }

    #[test]
    fn get_or_create_creates_once() {
        let (storage, _temp_dir) = test_storage();
        let repo = UserRepository::new(&storage);

        let (user, created) = repo.get_or_create("ann.lee@example.com", "ann.lee#8d2ca27f").unwrap();
        assert!(created);
        assert_eq!(user.email, "ann.lee@example.com");
        assert_eq!(user.username, "ann.lee#8d2ca27f");
        assert!(user.first_name.is_empty());
        assert!(user.last_login.is_none());

        let (again, created_again) = repo.get_or_create("ann.lee@example.com", "ann.lee#8d2ca27f").unwrap();
        assert!(!created_again);
        assert_eq!(again.id, user.id);
    }

    #[test]
    fn get_or_create_rejects_foreign_username() {
        let (storage, _temp_dir) = test_storage();
        let repo = UserRepository::new(&storage);

        repo.get_or_create("a@x.com", "a#cc71348b").unwrap();
        let result = repo.get_or_create("other@y.com", "a#cc71348b");
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn create_duplicate_fails() {
        let (storage, _temp_dir) = test_storage();
        let repo = UserRepository::new(&storage);

        let (user, _) = repo.get_or_create("a@x.com", "a#cc71348b").unwrap();
        let result = repo.create(&user);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn update_persists_changed_fields() {
        let (storage, _temp_dir) = test_storage();
        let repo = UserRepository::new(&storage);

        let (mut user, _) = repo.get_or_create("a@x.com", "a#cc71348b").unwrap();
        user.first_name = "Ann".to_string();
        user.last_name = "Lee".to_string();
        repo.update(&user).unwrap();

        let loaded = repo.get(&user.username).unwrap();
        assert_eq!(loaded.first_name, "Ann");
        assert_eq!(loaded.last_name, "Lee");
    }

    #[test]
    fn update_missing_user_fails() {
        let (storage, _temp_dir) = test_storage();
        let repo = UserRepository::new(&storage);

        let user = StoredUser {
            id: "u-1".to_string(),
            email: "ghost@x.com".to_string(),
            username: "ghost#1".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now(),
            last_login: None,
        };
        assert!(matches!(repo.update(&user), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn list_usernames_returns_created_users() {
        let (storage, _temp_dir) = test_storage();
        let repo = UserRepository::new(&storage);

        repo.get_or_create("a@x.com", "a#cc71348b").unwrap();
        repo.get_or_create("a@y.com", "a#cc834d0c").unwrap();

        let names = repo.list_usernames().unwrap();
        assert_eq!(names.len(), 2);
    }
}
