// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bridges external identity-provider credentials onto local user accounts.
//!
//! ## Auth Flow
//!
//! 1. Client obtains an ID token from its identity provider (first-party
//!    OAuth, Firebase, or Supabase)
//! 2. Client sends `Authorization: Bearer <token>` (or a body field on the
//!    login endpoint)
//! 3. This service:
//!    - decodes the claims without verifying the signature (routing only)
//!    - pre-checks expiry before any network call
//!    - selects the trust authority from the issuer hint
//!    - verifies the credential against that authority
//!    - reconciles the verified claims onto a local user and profile
//!
//! ## Security
//!
//! - Unverified claims are never used for identity decisions
//! - Every request re-verifies; there is no verification-result cache
//! - The dev-host username bypass requires `AUTH_DEBUG` and a configured
//!   dev host, and resolves only existing local users

pub mod claims;
pub mod decoder;
pub mod entry;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod reconciler;
pub mod router;
pub mod verifier;

pub use claims::{AuthenticatedClaims, UnverifiedClaims};
pub use entry::{AuthRequest, Authenticator};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use jwks::JwksManager;
pub use router::Authority;
pub use verifier::{AuthorityVerifier, VerifierRegistry};
