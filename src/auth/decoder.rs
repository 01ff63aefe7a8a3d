// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unverified credential decoding.
//!
//! Parses a credential's claims without checking its signature. The result
//! is only trusted far enough to read `exp` and the authority-routing hints
//! before committing to a verification round-trip; the selected verifier
//! re-validates everything.

use super::claims::UnverifiedClaims;

/// The credential is not a well-formed encoded claims structure.
#[derive(Debug, thiserror::Error)]
#[error("credential is not a well-formed token")]
pub struct MalformedCredential;

/// Decode a credential into unverified claims. Pure parse, no side effects.
pub fn decode_unverified(credential: &str) -> Result<UnverifiedClaims, MalformedCredential> {
    let data = jsonwebtoken::dangerous::insecure_decode::<UnverifiedClaims>(credential)
        .map_err(|_| MalformedCredential)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a test JWT token (unsigned, for testing only)
    fn create_test_jwt(claims_json: &str) -> String {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let header = r#"{"alg":"RS256","typ":"JWT"}"#;
        let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());

        format!("{}.{}.fake_signature", header_b64, claims_b64)
    }

    #[test]
    fn decodes_claims_without_signature_check() {
        let token = create_test_jwt(
            r#"{"exp":9999999999,"aud":"my-app","iss":"accounts.google.com","email":"a@x.com"}"#,
        );
        let claims = decode_unverified(&token).expect("decode succeeds");
        assert_eq!(claims.exp, 9999999999);
        assert_eq!(claims.audience(), Some("my-app"));
        assert_eq!(claims.iss.as_deref(), Some("accounts.google.com"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(decode_unverified("not-a-token").is_err());
        assert!(decode_unverified("").is_err());
        assert!(decode_unverified("a.b.c").is_err());
    }

    #[test]
    fn claims_without_exp_are_malformed() {
        let token = create_test_jwt(r#"{"aud":"my-app"}"#);
        assert!(decode_unverified(&token).is_err());
    }
}
