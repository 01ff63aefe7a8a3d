// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity reconciliation: mapping authenticated claims onto local users.
//!
//! Find-or-create the user for the asserted email, derive the
//! collision-resistant username, mirror the claim fields that are present
//! into the user and profile, and stamp the login time. Every persistence
//! failure propagates unrecovered; retrying is the store's concern, not
//! this module's.

use chrono::Utc;

use crate::storage::repository::{ProfileRepository, ProfileSeed, StoredUser, UserRepository};
use crate::storage::{FileStorage, StorageResult};

use super::claims::AuthenticatedClaims;

/// djb2 string hash, truncated to 32 bits and rendered as lowercase hex.
///
/// Collision disambiguation only, not a security mechanism. The constants
/// are load-bearing: existing derived usernames depend on them.
pub fn djb2(seed: &str) -> String {
    let mut hash: u32 = 5381;
    for c in seed.chars() {
        hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(c as u32);
    }
    format!("{hash:x}")
}

/// Derive the local username for an email.
///
/// The local part alone collides across domains (`some@email1.com` vs
/// `some@email2.com`), so the full address is hashed into a suffix. Same
/// email in, same username out, always.
pub fn derive_username(email: &str) -> String {
    let local_part = email.split('@').next().unwrap_or(email);
    format!("{local_part}#{}", djb2(email))
}

/// Split a display name into a first name and the remainder.
fn split_display_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Maps authenticated claims onto persisted local identity.
pub struct IdentityReconciler<'a> {
    storage: &'a FileStorage,
}

impl<'a> IdentityReconciler<'a> {
    /// Create a new IdentityReconciler.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Find-or-create the user and profile for authenticated claims and
    /// return the user.
    ///
    /// Only claim fields that are present are written; absent fields are
    /// left untouched, never cleared. `last_login` and the profile's
    /// `updated_at` advance on every call.
    pub fn reconcile(
        &self,
        claims: &AuthenticatedClaims,
        seed: &ProfileSeed,
    ) -> StorageResult<StoredUser> {
        let users = UserRepository::new(self.storage);
        let username = derive_username(&claims.email);
        let (mut user, _created) = users.get_or_create(&claims.email, &username)?;

        if let Some(name) = claims.name.as_deref() {
            let (first_name, last_name) = split_display_name(name);
            if user.first_name != first_name || user.last_name != last_name {
                user.first_name = first_name;
                user.last_name = last_name;
                users.update(&user)?;
            }
        }

        let profiles = ProfileRepository::new(self.storage);
        let mut profile = profiles.get_or_create(&user.username, seed)?;
        if let Some(picture) = &claims.picture {
            profile.photo_url = Some(picture.clone());
        }
        if let Some(phone) = &claims.phone_number {
            profile.phone_number = Some(phone.clone());
        }
        if let Some(name) = &claims.name {
            profile.display_name = Some(name.clone());
        }
        profile.updated_at = Utc::now();
        profiles.update(&user.username, &profile)?;

        user.last_login = Some(Utc::now());
        users.update(&user)?;

        Ok(user)
    }
}
