//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (backlog > 0, timeouts > 0)
//! - Check auth settings are usable when auth is required
//! - Detect conflicting mounts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::net::IpAddr;

use crate::config::schema::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("bind_address '{0}' is not an IP address")]
    BindAddress(String),
    #[error("backlog must be greater than 0")]
    Backlog,
    #[error("timeouts.request_secs must be greater than 0")]
    RequestTimeout,
    #[error("limits.max_body_size must be greater than 0")]
    MaxBodySize,
    #[error("require_auth is set but no credentials are configured")]
    MissingCredentials,
    #[error("prefix '{0}' must start with '/'")]
    RelativePrefix(String),
    #[error("prefix '{0}' is mounted more than once")]
    DuplicatePrefix(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.bind_address.clone()));
    }
    if config.backlog == 0 {
        errors.push(ValidationError::Backlog);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::MaxBodySize);
    }

    let has_basic = !config.auth.user.is_empty() && !config.auth.password.is_empty();
    let has_key = config.auth.api_key.as_deref().is_some_and(|k| !k.is_empty());
    if config.require_auth && !has_basic && !has_key {
        errors.push(ValidationError::MissingCredentials);
    }

    let mut seen: Vec<&str> = Vec::new();
    let prefixes = config
        .static_dirs
        .iter()
        .map(|d| d.prefix.as_str())
        .chain(config.api_prefix.as_deref());
    for prefix in prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix(prefix.to_string()));
            continue;
        }
        let normalized = match prefix.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        if seen.contains(&normalized) {
            errors.push(ValidationError::DuplicatePrefix(prefix.to_string()));
        } else {
            seen.push(normalized);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
