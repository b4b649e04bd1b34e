//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use embedded_httpd::{
    ApiHandler, ApiRequest, FileHandler, Handler, HandlerError, HandlerResult, Method, Payload,
    Route, Server, ServerConfig, Shutdown,
};
use serde_json::json;

pub const USER: &str = "admin";
pub const PASSWORD: &str = "uhttpd";

/// Seed a document root with a small site.
pub fn init_fixture(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join("index.html"), "<html><body>Hello World!</body></html>").unwrap();
    fs::create_dir_all(root.join("foo/bar")).unwrap();
    fs::write(root.join("foo/test.txt"), "test").unwrap();
    fs::write(root.join("foo/bar/test.js"), "{'foo': \"bar\"}").unwrap();
    fs::write(root.join("foo/bar/test.css"), "html").unwrap();
    fs::write(root.join("hello world.txt"), "hello").unwrap();
    fs::write(root.join("данные.txt"), "данные").unwrap();
}

/// API handler returning one of every payload shape, picked by the first
/// context segment.
pub struct TestApiHandler;

impl Handler for TestApiHandler {
    fn supports(&self, method: Method) -> bool {
        matches!(method, Method::Get | Method::Put | Method::Post | Method::Delete)
    }

    #[allow(clippy::approx_constant)]
    fn get(&self, request: &ApiRequest) -> HandlerResult {
        let Some(what) = request.context.first() else {
            return Ok(json!({"action": "get"}).into());
        };
        match what.as_str() {
            "query_params" => Payload::json(&request.query_params),
            "context" => Ok(json!({"context": request.context}).into()),
            "nothing" => Ok(Payload::Empty),
            "empty" => Ok(Vec::<u8>::new().into()),
            "something" => Ok((&b"something"[..]).into()),
            "html" => Ok("<html><body><h1>HTML</h1></body></html>".into()),
            "json" => Ok(json!({"some": [{"j": 1, "s": [], "o": "str", "n": {"дружище": "バディ"}}]}).into()),
            "int" => Ok(1342i64.into()),
            "float" => Ok(3.14159f64.into()),
            "bad_request_exception" => Err(HandlerError::bad_request("derp")),
            "not_found_exception" => Err(HandlerError::not_found("what you were looking for")),
            "forbidden_exception" => Err(HandlerError::forbidden("tsktsk")),
            "panic" => panic!("handler bug"),
            _ => Ok(Payload::Empty),
        }
    }

    fn put(&self, _request: &ApiRequest) -> HandlerResult {
        Ok(json!({"action": "put"}).into())
    }

    fn post(&self, request: &ApiRequest) -> HandlerResult {
        if request.body.is_empty() {
            return Ok(json!({"action": "post"}).into());
        }
        let body: serde_json::Value = request.json_body()?;
        Ok(json!({"action": "post", "body": body}).into())
    }

    fn delete(&self, _request: &ApiRequest) -> HandlerResult {
        Ok(json!({"action": "delete"}).into())
    }
}

/// Routes used by the harness: the API first, then the file tree.
pub fn harness_routes(root: &Path) -> Vec<Route> {
    vec![
        Route::new("/api", ApiHandler::new().with_handler("test", TestApiHandler)),
        Route::new("/test", FileHandler::new(root)),
    ]
}

pub fn test_config(require_auth: bool) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.bind_address = "127.0.0.1".into();
    config.port = 0;
    config.require_auth = require_auth;
    config.auth.user = USER.into();
    config.auth.password = PASSWORD.into();
    config
}

/// Bind an ephemeral port and serve `routes` in the background.
pub async fn start_server(routes: Vec<Route>, config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = Server::bind(&config).unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(routes, config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
