//! HTTP server setup and the request lifecycle.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener, serve until shutdown
//! - Run routing → auth → dispatch → encoding for each request

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::handlers::{dispatch, ApiRequest, Method};
use crate::http::error::DispatchError;
use crate::lifecycle::ShutdownSignal;
use crate::http::request::Request;
use crate::http::response::{encode, encode_error, EncodedResponse};
use crate::net::{self, ListenerError};
use crate::observability::metrics;
use crate::routing::{Route, RouteError, RouteTable};
use crate::security::{AuthDecision, AuthGate};

/// Routing, auth and dispatch; everything that runs after the body is buffered.
struct Core {
    routes: RouteTable,
    auth: AuthGate,
}

impl Core {
    fn respond(&self, request: Request) -> EncodedResponse {
        let start = Instant::now();
        let request_id = request.request_id().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            "Handling request"
        );

        let (route, response) = self.process(&request);
        let response = if request.method == axum::http::Method::HEAD {
            response.without_body()
        } else {
            response
        };

        metrics::record_request(
            request.method.as_str(),
            response.status.as_u16(),
            route.unwrap_or("none"),
            start,
        );
        tracing::info!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request complete"
        );
        response
    }

    /// Returns the matched route prefix (for metrics) and the response.
    fn process<'a>(&'a self, request: &Request) -> (Option<&'a str>, EncodedResponse) {
        let request_id = request.request_id();

        // 1. Match Route
        let Some(matched) = self.routes.match_path(&request.path) else {
            tracing::warn!(request_id = %request_id, path = %request.path, "No route matched");
            return (None, encode_error(&DispatchError::NoRoute(request.path.clone())));
        };
        let prefix = Some(matched.route.prefix());

        // 2. Auth
        if self.auth.check(&request.headers) == AuthDecision::Denied {
            tracing::warn!(request_id = %request_id, path = %request.path, "Authentication failed");
            let mut response = encode_error(&DispatchError::Unauthorized);
            response
                .headers
                .insert(header::WWW_AUTHENTICATE, self.auth.challenge());
            return (prefix, response);
        }

        // 3. Dispatch
        let handler = matched.route.handler();
        let outcome = match Method::from_http(&request.method) {
            Some(method) => {
                let api_request = ApiRequest::from_request(request, matched.context);
                dispatch(handler, method, &api_request)
            }
            None => Err(DispatchError::MethodNotAllowed {
                allowed: handler.allowed_methods(),
            }),
        };

        if let Err(DispatchError::Internal(e)) = &outcome {
            tracing::error!(request_id = %request_id, path = %request.path, error = ?e, "Handler failed");
        }

        // 4. Encode
        (prefix, encode(outcome))
    }
}

/// Application state injected into the catch-all handler.
#[derive(Clone)]
pub struct AppState {
    core: Arc<Core>,
    max_body_size: usize,
}

/// Embedded HTTP server: an ordered route table plus configuration.
pub struct Server {
    core: Arc<Core>,
    config: ServerConfig,
}

impl Server {
    /// Create a server from routes in registration order.
    pub fn new(routes: Vec<Route>, config: ServerConfig) -> Result<Self, RouteError> {
        let routes = RouteTable::new(routes)?;
        tracing::info!(
            routes = ?routes.prefixes().collect::<Vec<_>>(),
            require_auth = config.require_auth,
            "Server configured"
        );
        let core = Arc::new(Core {
            routes,
            auth: AuthGate::from_config(&config),
        });
        Ok(Self { core, config })
    }

    /// Bind a listener for `config` (address, port, backlog).
    pub fn bind(config: &ServerConfig) -> Result<TcpListener, ListenerError> {
        net::bind(config)
    }

    /// Handle one buffered request without a socket.
    pub fn respond(&self, request: Request) -> EncodedResponse {
        self.core.respond(request)
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let state = AppState {
            core: self.core.clone(),
            max_body_size: self.config.limits.max_body_size,
        };
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(middleware::from_fn_with_state(
                self.config.limits.max_headers,
                limit_headers,
            ))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Outermost layer: counts only the headers the client sent, before the
/// request-ID layer adds its own.
async fn limit_headers(
    State(max_headers): State<usize>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let count = request.headers().len();
    if count > max_headers {
        tracing::warn!(count, max_headers, "Too many request headers");
        return (
            StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            "Request Header Fields Too Large",
        )
            .into_response();
    }
    next.run(request).await
}

/// Catch-all handler: buffer the body, then run the synchronous core on the
/// blocking pool (file handlers do blocking IO).
async fn dispatch_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> Response {
    let request = match Request::from_http(request, state.max_body_size).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response();
        }
    };

    let core = state.core.clone();
    match tokio::task::spawn_blocking(move || core.respond(request)).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Request task failed");
            encode_error(&DispatchError::Internal(e.into())).into_response()
        }
    }
}
