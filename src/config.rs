// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Settings are loaded from the environment once at startup and passed
//! explicitly into the authenticator and verifier constructors. There is no
//! process-global provider state, so multiple configurations can coexist in
//! tests.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the identity store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_DEBUG` | Enable the dev-host username bypass | `false` |
//! | `AUTH_DEV_HOSTS` | Comma-separated hosts eligible for the bypass | `localhost,127.0.0.1` |
//! | `OAUTH_ISSUERS` | Comma-separated first-party OAuth issuers | Google issuers |
//! | `OAUTH_TOKENINFO_URL` | First-party token verification endpoint | Google tokeninfo |
//! | `FIREBASE_PROJECT_ID` | Enables the Firebase authority | Unset |
//! | `FIREBASE_JWKS_URL` | Key set for Firebase ID token signatures | securetoken JWKS |
//! | `FIREBASE_CHECK_REVOKED` | Check token revocation on every login | `false` |
//! | `FIREBASE_API_KEY` | API key for the revocation lookup | Unset |
//! | `SUPABASE_URL` | Enables the Supabase authority (with the key) | Unset |
//! | `SUPABASE_ANON_KEY` | Supabase anon key sent with user lookups | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use url::Url;

/// Environment variable name for the identity store root directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

const DEFAULT_DEV_HOSTS: &str = "localhost,127.0.0.1";
const DEFAULT_OAUTH_ISSUERS: &str = "accounts.google.com,https://accounts.google.com";
const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const DEFAULT_FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Settings configuration error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Deployment-wide authentication settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Whether the dev-host username bypass is enabled
    pub debug: bool,
    /// Hosts on which the bypass is recognized
    pub dev_hosts: Vec<String>,
    /// First-party OAuth authority, if configured
    pub first_party: Option<FirstPartySettings>,
    /// Firebase authority, if configured
    pub firebase: Option<FirebaseSettings>,
    /// Supabase authority, if configured
    pub supabase: Option<SupabaseSettings>,
}

/// First-party OAuth authority settings.
#[derive(Debug, Clone)]
pub struct FirstPartySettings {
    /// Issuer values that route a credential to this authority
    pub issuers: Vec<String>,
    /// Token verification endpoint
    pub tokeninfo_url: String,
}

/// Firebase authority settings.
#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    /// Firebase project id (also the expected audience)
    pub project_id: String,
    /// JWKS endpoint for ID token signatures
    pub jwks_url: String,
    /// Whether to check revocation on every verification
    pub check_revoked: bool,
    /// API key for the revocation lookup endpoint
    pub api_key: Option<String>,
}

impl FirebaseSettings {
    /// The issuer Firebase stamps into ID tokens for this project.
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

/// Supabase authority settings.
#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    /// Project base URL
    pub url: String,
    /// Anon key sent with user lookups
    pub anon_key: String,
}

impl AuthSettings {
    /// Load settings from the environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        let debug = parse_bool(&env_or_default("AUTH_DEBUG", "false"));
        let dev_hosts = parse_list(&env_or_default("AUTH_DEV_HOSTS", DEFAULT_DEV_HOSTS));

        let tokeninfo_url = env_or_default("OAUTH_TOKENINFO_URL", DEFAULT_TOKENINFO_URL);
        check_url("OAUTH_TOKENINFO_URL", &tokeninfo_url)?;
        let first_party = Some(FirstPartySettings {
            issuers: parse_list(&env_or_default("OAUTH_ISSUERS", DEFAULT_OAUTH_ISSUERS)),
            tokeninfo_url,
        });

        let firebase = match env_opt("FIREBASE_PROJECT_ID") {
            Some(project_id) => {
                let jwks_url = env_or_default("FIREBASE_JWKS_URL", DEFAULT_FIREBASE_JWKS_URL);
                check_url("FIREBASE_JWKS_URL", &jwks_url)?;
                let check_revoked = parse_bool(&env_or_default("FIREBASE_CHECK_REVOKED", "false"));
                let api_key = env_opt("FIREBASE_API_KEY");
                if check_revoked && api_key.is_none() {
                    return Err(SettingsError::Invalid {
                        name: "FIREBASE_CHECK_REVOKED",
                        reason: "revocation checks require FIREBASE_API_KEY".to_string(),
                    });
                }
                Some(FirebaseSettings {
                    project_id,
                    jwks_url,
                    check_revoked,
                    api_key,
                })
            }
            None => None,
        };

        let supabase = match (env_opt("SUPABASE_URL"), env_opt("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => {
                check_url("SUPABASE_URL", &url)?;
                Some(SupabaseSettings {
                    url: url.trim_end_matches('/').to_string(),
                    anon_key,
                })
            }
            (Some(_), None) => {
                return Err(SettingsError::Invalid {
                    name: "SUPABASE_ANON_KEY",
                    reason: "SUPABASE_URL is set but SUPABASE_ANON_KEY is not".to_string(),
                })
            }
            _ => None,
        };

        Ok(Self {
            debug,
            dev_hosts,
            first_party,
            firebase,
            supabase,
        })
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_url(name: &'static str, value: &str) -> Result<(), SettingsError> {
    Url::parse(value).map_err(|e| SettingsError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    Ok(())
}
