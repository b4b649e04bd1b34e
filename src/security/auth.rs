//! Global authentication gate.
//!
//! Applied once per request, before dispatch, to every route alike.
//! Accepts HTTP Basic credentials, and a Bearer token when one is configured.

use axum::http::{header, HeaderMap, HeaderValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;

use crate::config::ServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Denied,
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    required: bool,
    realm: String,
    user: String,
    password: String,
    api_key: Option<String>,
}

impl AuthGate {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            required: config.require_auth,
            realm: config.auth.realm.clone(),
            user: config.auth.user.clone(),
            password: config.auth.password.clone(),
            api_key: config.auth.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn check(&self, headers: &HeaderMap) -> AuthDecision {
        if !self.required {
            return AuthDecision::Allowed;
        }

        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let allowed = match auth_header.and_then(|v| v.split_once(' ')) {
            Some((scheme, value)) if scheme.eq_ignore_ascii_case("basic") => {
                self.basic_matches(value.trim())
            }
            Some((scheme, value)) if scheme.eq_ignore_ascii_case("bearer") => self
                .api_key
                .as_deref()
                .is_some_and(|key| secret_eq(key, value.trim())),
            _ => false,
        };

        if allowed {
            AuthDecision::Allowed
        } else {
            AuthDecision::Denied
        }
    }

    fn basic_matches(&self, encoded: &str) -> bool {
        if self.user.is_empty() || self.password.is_empty() {
            return false;
        }
        let Ok(decoded) = STANDARD.decode(encoded) else {
            return false;
        };
        let Ok(credentials) = String::from_utf8(decoded) else {
            return false;
        };
        match credentials.split_once(':') {
            Some((user, password)) => {
                // Both comparisons always run.
                let user_ok = secret_eq(user, &self.user);
                let password_ok = secret_eq(password, &self.password);
                user_ok & password_ok
            }
            None => false,
        }
    }

    /// `WWW-Authenticate` value sent with a 401.
    pub fn challenge(&self) -> HeaderValue {
        let realm = self.realm.replace(['"', '\\'], "");
        HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"))
    }
}

/// Constant-time comparison for credentials. Only the length can leak.
fn secret_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
