// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims at the two trust levels the bridge distinguishes.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Claims decoded from a credential without signature verification.
///
/// Only good for two things: the cheap expiry pre-check and deciding which
/// authority must verify the credential. Identity decisions are never based
/// on these values.
#[derive(Debug, Clone, Deserialize)]
pub struct UnverifiedClaims {
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Intended audience (a string, or an array of strings)
    #[serde(default)]
    pub aud: Option<Value>,

    /// Issuer, the primary authority-routing hint
    #[serde(default)]
    pub iss: Option<String>,

    /// Remaining claims, kept for routing hints
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl UnverifiedClaims {
    /// The first audience entry, if any.
    pub fn audience(&self) -> Option<&str> {
        match &self.aud {
            Some(Value::String(s)) => Some(s),
            Some(Value::Array(items)) => items.first().and_then(|v| v.as_str()),
            _ => None,
        }
    }

    /// Whether `exp` lies before `now` (seconds since epoch).
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }
}

/// Claims returned by a successful verification call.
///
/// The only value identity decisions may be based on. `email` is the stable
/// identifier local users are keyed by; the rest are optional provider
/// attributes mirrored into the user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedClaims {
    /// Email asserted by the verifying authority
    pub email: String,
    /// Provider-assigned subject identifier
    pub uid: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Avatar URL
    pub picture: Option<String>,
    /// Phone number
    pub phone_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> UnverifiedClaims {
        serde_json::from_value(value).expect("claims deserialize")
    }

    #[test]
    fn audience_reads_string_and_array() {
        let claims = decode(json!({"exp": 10, "aud": "my-app"}));
        assert_eq!(claims.audience(), Some("my-app"));

        let claims = decode(json!({"exp": 10, "aud": ["first", "second"]}));
        assert_eq!(claims.audience(), Some("first"));

        let claims = decode(json!({"exp": 10}));
        assert_eq!(claims.audience(), None);
    }

    #[test]
    fn expiry_comparison() {
        let claims = decode(json!({"exp": 100}));
        assert!(claims.is_expired_at(101));
        assert!(!claims.is_expired_at(100));
        assert!(!claims.is_expired_at(50));
    }

    #[test]
    fn missing_exp_is_rejected() {
        let result = serde_json::from_value::<UnverifiedClaims>(json!({"aud": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn extra_claims_are_retained() {
        let claims = decode(json!({"exp": 10, "iss": "accounts.google.com", "sub": "123"}));
        assert_eq!(claims.iss.as_deref(), Some("accounts.google.com"));
        assert_eq!(claims.extra.get("sub"), Some(&json!("123")));
    }
}
