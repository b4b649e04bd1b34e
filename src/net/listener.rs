//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind to the configured address and port
//! - Apply the configured backlog to the pending-connection queue
//!
//! # Design Decisions
//! - The socket is built with `TcpSocket` so the backlog reaches listen(2);
//!   `TcpListener::bind` would use the platform default
//! - Must be called from inside a Tokio runtime

use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, TcpSocket};

use crate::config::ServerConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The configured bind address is not an IP address.
    #[error("Invalid bind address '{0}'")]
    Address(String),
    /// Failed to bind to address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind a listener for `config` with its backlog.
pub fn bind(config: &ServerConfig) -> Result<TcpListener, ListenerError> {
    let ip: IpAddr = config
        .bind_address
        .parse()
        .map_err(|_| ListenerError::Address(config.bind_address.clone()))?;
    let addr = SocketAddr::new(ip, config.port);
    let bind_err = |source: std::io::Error| ListenerError::Bind { addr, source };

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(bind_err)?;
    socket.set_reuseaddr(true).map_err(bind_err)?;
    socket.bind(addr).map_err(bind_err)?;
    let listener = socket.listen(config.backlog).map_err(bind_err)?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(addr),
        backlog = config.backlog,
        "Listener bound"
    );
    Ok(listener)
}
