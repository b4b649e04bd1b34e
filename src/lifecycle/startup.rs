//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn the configured mounts into the ordered route list
//! - Mount the built-in API handler
//!
//! # Design Decisions
//! - The API prefix is registered first so it is tried before file mounts
//! - Fail fast: a bad mount is a startup error, not a runtime 404

use crate::config::ServerConfig;
use crate::handlers::{ApiHandler, FileHandler, StatusHandler};
use crate::routing::Route;

/// Routes the binary registers for `config`.
pub fn routes_from_config(config: &ServerConfig) -> Vec<Route> {
    let mut routes = Vec::new();

    if let Some(prefix) = &config.api_prefix {
        let api = ApiHandler::new().with_handler("status", StatusHandler::new());
        tracing::info!(prefix = %prefix, "Mounting API handler");
        routes.push(Route::new(prefix.clone(), api));
    }

    for dir in &config.static_dirs {
        tracing::info!(prefix = %dir.prefix, root = %dir.root_path, "Mounting file handler");
        routes.push(Route::new(dir.prefix.clone(), FileHandler::new(&dir.root_path)));
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticDirConfig;

    #[test]
    fn api_first_then_static() {
        let mut config = ServerConfig::default();
        config.static_dirs.push(StaticDirConfig {
            prefix: "/test".into(),
            root_path: "/srv/test".into(),
        });
        let routes = routes_from_config(&config);
        let prefixes: Vec<_> = routes.iter().map(Route::prefix).collect();
        assert_eq!(prefixes, vec!["/api", "/test"]);
    }

    #[test]
    fn api_can_be_disabled() {
        let mut config = ServerConfig::default();
        config.api_prefix = None;
        assert!(routes_from_config(&config).is_empty());
    }
}
