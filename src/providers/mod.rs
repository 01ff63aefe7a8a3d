// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound verification clients, one per identity provider.

pub mod firebase;
pub mod google;
pub mod supabase;

pub use firebase::FirebaseVerifier;
pub use google::GoogleVerifier;
pub use supabase::SupabaseVerifier;
