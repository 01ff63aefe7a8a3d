// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the identity store layout.

use std::path::{Path, PathBuf};

/// Base directory for all persistent identity data.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities for the identity store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all users.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Directory for a specific user, keyed by username.
    pub fn user_dir(&self, username: &str) -> PathBuf {
        self.users_dir().join(user_key(username))
    }

    /// Path to a user's identity record.
    pub fn user_record(&self, username: &str) -> PathBuf {
        self.user_dir(username).join("user.json")
    }

    /// Path to a user's provider profile.
    pub fn user_profile(&self, username: &str) -> PathBuf {
        self.user_dir(username).join("profile.json")
    }

    // ========== Access Token Paths ==========

    /// Directory containing issued access tokens.
    pub fn tokens_dir(&self) -> PathBuf {
        self.root.join("tokens")
    }

    /// Path to a specific access token file.
    pub fn token(&self, token: &str) -> PathBuf {
        self.tokens_dir().join(format!("{}.json", user_key(token)))
    }
}

/// Filesystem-safe encoding of a username.
///
/// Usernames are derived from email local parts and may contain characters
/// that are unsafe in paths. The digest suffix already present in every
/// username keeps encoded names distinct.
pub fn user_key(username: &str) -> String {
    username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '#' | '+') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("/data"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.user_record("ann#8d2ca27f"),
            PathBuf::from("/tmp/test-data/users/ann#8d2ca27f/user.json")
        );
    }

    #[test]
    fn user_paths_are_correct() {
        let paths = StoragePaths::default();
        assert_eq!(paths.users_dir(), PathBuf::from("/data/users"));
        assert_eq!(
            paths.user_dir("alice#a00ab25c"),
            PathBuf::from("/data/users/alice#a00ab25c")
        );
        assert_eq!(
            paths.user_profile("alice#a00ab25c"),
            PathBuf::from("/data/users/alice#a00ab25c/profile.json")
        );
    }

    #[test]
    fn token_paths_are_correct() {
        let paths = StoragePaths::default();
        assert_eq!(paths.tokens_dir(), PathBuf::from("/data/tokens"));
        assert_eq!(
            paths.token("abc123"),
            PathBuf::from("/data/tokens/abc123.json")
        );
    }

    #[test]
    fn user_key_replaces_unsafe_characters() {
        assert_eq!(user_key("ann.lee#8d2ca27f"), "ann.lee#8d2ca27f");
        assert_eq!(user_key("a/b#12345678"), "a_b#12345678");
        assert_eq!(user_key("a b#12345678"), "a_b#12345678");
    }
}
