//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Listen port. 0 picks an ephemeral port.
    pub port: u16,

    /// Pending connection queue depth passed to listen(2).
    pub backlog: u32,

    /// Reject unauthenticated requests before any handler runs.
    pub require_auth: bool,

    /// Credentials checked when `require_auth` is set.
    pub auth: AuthConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Directories served by file handlers (mounted by the binary).
    pub static_dirs: Vec<StaticDirConfig>,

    /// Prefix for the built-in API handler. `None` disables it.
    pub api_prefix: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 80,
            backlog: 10,
            require_auth: false,
            auth: AuthConfig::default(),
            limits: LimitsConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            static_dirs: Vec::new(),
            api_prefix: Some("/api".to_string()),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Realm announced in the `WWW-Authenticate` challenge.
    pub realm: String,

    /// HTTP Basic user.
    pub user: String,

    /// HTTP Basic password.
    pub password: String,

    /// Optional Bearer token accepted in addition to Basic credentials.
    pub api_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            realm: "device".to_string(),
            user: "admin".to_string(),
            // WARNING: This is a placeholder! Change this on real devices.
            password: "uhttpd".to_string(),
            api_key: None,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Maximum number of request headers.
    pub max_headers: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
            max_headers: 25,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A directory served under a path prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticDirConfig {
    /// Path prefix to mount the directory at.
    pub prefix: String,

    /// Directory on disk.
    pub root_path: String,
}
