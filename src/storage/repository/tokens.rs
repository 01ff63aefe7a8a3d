// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token repository.
//!
//! Opaque session tokens handed out by the login endpoint. At most one
//! token per user, created on demand and reused on subsequent logins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{FileStorage, StorageError, StorageResult};
use super::users::StoredUser;

/// An issued opaque access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredAccessToken {
    /// The opaque token value
    pub token: String,
    /// Username of the owning user
    pub username: String,
    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

/// Repository for issued access tokens.
pub struct AccessTokenRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> AccessTokenRepository<'a> {
    /// Create a new AccessTokenRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Look up a token by value.
    pub fn get(&self, token: &str) -> StorageResult<StoredAccessToken> {
        let path = self.storage.paths().token(token);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound("Access token".to_string()));
        }
        self.storage.read_json(path)
    }

    /// Get the user's access token, issuing a fresh one if none exists.
    pub fn issue_for(&self, user: &StoredUser) -> StorageResult<StoredAccessToken> {
        if let Some(existing) = self.find_by_username(&user.username)? {
            return Ok(existing);
        }

        let token = StoredAccessToken {
            token: Uuid::new_v4().simple().to_string(),
            username: user.username.clone(),
            created_at: Utc::now(),
        };
        self.storage
            .create_json(self.storage.paths().token(&token.token), &token)?;
        Ok(token)
    }

    /// Find the token owned by a user, if any.
    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredAccessToken>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().tokens_dir(), "json")?;

        for id in &ids {
            if let Ok(token) = self.get(id) {
                if token.username == username {
                    return Ok(Some(token));
                }
            }
        }

        Ok(None)
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

    fn test_user(username: &str) -> StoredUser {
        StoredUser {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@example.com", username.split('#').next().unwrap()),
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn issue_for_reuses_existing_token() {
        let (storage, _temp_dir) = test_storage();
        let repo = AccessTokenRepository::new(&storage);
        let user = test_user("ann#8d2ca27f");

        let first = repo.issue_for(&user).unwrap();
        let second = repo.issue_for(&user).unwrap();
        assert_eq!(first.token, second.token);
    }

    #[test]
    fn issued_token_is_retrievable() {
        let (storage, _temp_dir) = test_storage();
        let repo = AccessTokenRepository::new(&storage);
        let user = test_user("alice#a00ab25c");

        let issued = repo.issue_for(&user).unwrap();
        let loaded = repo.get(&issued.token).unwrap();
        assert_eq!(loaded.username, user.username);
    }

    #[test]
    fn tokens_are_distinct_per_user() {
        let (storage, _temp_dir) = test_storage();
        let repo = AccessTokenRepository::new(&storage);

        let token_a = repo.issue_for(&test_user("a#1")).unwrap();
        let token_b = repo.issue_for(&test_user("b#2")).unwrap();
        assert_ne!(token_a.token, token_b.token);
    }

    #[test]
    fn unknown_token_is_not_found() {
        let (storage, _temp_dir) = test_storage();
        let repo = AccessTokenRepository::new(&storage);

        let result = repo.get("does-not-exist");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
