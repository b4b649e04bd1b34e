//! End-to-end tests against a live server on an ephemeral port.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{client, harness_routes, init_fixture, start_server, test_config, PASSWORD, USER};

struct Harness {
    base: String,
    shutdown: embedded_httpd::Shutdown,
    client: reqwest::Client,
    _root: tempfile::TempDir,
}

impl Harness {
    async fn start() -> Self {
        let root = tempfile::tempdir().unwrap();
        init_fixture(root.path());
        let (addr, shutdown) = start_server(harness_routes(root.path()), test_config(true)).await;
        Self {
            base: format!("http://{}", addr),
            shutdown,
            client: client(),
            _root: root,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base, path))
            .basic_auth(USER, Some(PASSWORD))
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn content_type(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn test_missing_credentials_are_rejected() {
    let h = Harness::start().await;

    let resp = h.client.get(format!("{}/api/test", h.base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(reqwest::header::WWW_AUTHENTICATE));

    let resp = h
        .client
        .get(format!("{}/api/test", h.base))
        .basic_auth(USER, Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unrouted_path_is_404_before_auth() {
    let h = Harness::start().await;
    let resp = h.client.get(format!("{}/nowhere", h.base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_default_and_method_shapes() {
    let h = Harness::start().await;

    let resp = h.get("/api/test").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({"action": "get"}));

    for (method, action) in [
        (reqwest::Method::PUT, "put"),
        (reqwest::Method::POST, "post"),
        (reqwest::Method::DELETE, "delete"),
    ] {
        let resp = h.request(method, "/api/test").send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "action": action }));
    }
}

#[tokio::test]
async fn test_post_json_body_reaches_handler() {
    let h = Harness::start().await;

    let resp = h
        .request(reqwest::Method::POST, "/api/test")
        .json(&json!({"led": "on"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({"action": "post", "body": {"led": "on"}})
    );

    let resp = h
        .request(reqwest::Method::POST, "/api/test")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_query_params_are_echoed() {
    let h = Harness::start().await;
    let resp = h
        .get("/api/test/query_params?foo=bar&name=hello%20world")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({"foo": "bar", "name": "hello world"})
    );
}

#[tokio::test]
async fn test_query_params_exact_mapping() {
    let h = Harness::start().await;

    let resp = h.get("/api/test/query_params?a=1&b=2").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({"a": "1", "b": "2"}));

    let resp = h
        .get("/api/test/query_params?tag=x&a=1&tag=y")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({"tag": ["x", "y"], "a": "1"})
    );
}

#[tokio::test]
async fn test_payload_encoding() {
    let h = Harness::start().await;

    let resp = h.get("/api/test/nothing").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.bytes().await.unwrap().is_empty());

    let resp = h.get("/api/test/empty").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("application/octet-stream"));
    assert!(resp.bytes().await.unwrap().is_empty());

    let resp = h.get("/api/test/something").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("application/octet-stream"));
    assert_eq!(&resp.bytes().await.unwrap()[..], b"something");

    let resp = h.get("/api/test/html").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("text/html"));
    assert_eq!(
        resp.text().await.unwrap(),
        "<html><body><h1>HTML</h1></body></html>"
    );

    let resp = h.get("/api/test/int").send().await.unwrap();
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));
    assert_eq!(resp.text().await.unwrap(), "1342");

    let resp = h.get("/api/test/float").send().await.unwrap();
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));
    assert_eq!(resp.text().await.unwrap(), "3.14159");
}

#[tokio::test]
async fn test_json_keeps_non_ascii_intact() {
    let h = Harness::start().await;
    let resp = h.get("/api/test/json").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));

    let text = resp.text().await.unwrap();
    assert!(text.contains("дружище"));
    assert!(text.contains("バディ"));
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        json!({"some": [{"j": 1, "s": [], "o": "str", "n": {"дружище": "バディ"}}]})
    );
}

#[tokio::test]
async fn test_domain_errors_map_to_status() {
    let h = Harness::start().await;

    for (path, status, message) in [
        ("/api/test/bad_request_exception", StatusCode::BAD_REQUEST, "derp"),
        (
            "/api/test/not_found_exception",
            StatusCode::NOT_FOUND,
            "what you were looking for",
        ),
        ("/api/test/forbidden_exception", StatusCode::FORBIDDEN, "tsktsk"),
    ] {
        let resp = h.get(path).send().await.unwrap();
        assert_eq!(resp.status(), status, "{}", path);
        assert!(resp.text().await.unwrap().contains(message), "{}", path);
    }
}

#[tokio::test]
async fn test_unknown_api_name_is_404() {
    let h = Harness::start().await;
    let resp = h.get("/api/missing/thing").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handler_panic_is_contained() {
    let h = Harness::start().await;

    let resp = h.get("/api/test/panic").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!resp.text().await.unwrap().contains("handler bug"));

    // Server keeps serving after the failure.
    let resp = h.get("/api/test/int").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_static_files_are_served() {
    let h = Harness::start().await;

    let resp = h.get("/test").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("text/html"));
    assert_eq!(
        resp.text().await.unwrap(),
        "<html><body>Hello World!</body></html>"
    );

    let resp = h.get("/test/foo/test.txt").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("text/plain"));
    assert_eq!(resp.text().await.unwrap(), "test");

    let resp = h.get("/test/foo/bar/test.js").send().await.unwrap();
    assert_eq!(content_type(&resp).as_deref(), Some("application/javascript"));
    assert_eq!(resp.text().await.unwrap(), "{'foo': \"bar\"}");

    let resp = h.get("/test/foo/bar/test.css").send().await.unwrap();
    assert_eq!(content_type(&resp).as_deref(), Some("text/css"));
    assert_eq!(resp.text().await.unwrap(), "html");

    let resp = h.get("/test/foo/missing.txt").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_percent_encoded_file_names() {
    let h = Harness::start().await;

    let resp = h.get("/test/hello%20world.txt").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp).as_deref(), Some("text/plain"));
    assert_eq!(resp.text().await.unwrap(), "hello");

    // reqwest percent-encodes the non-ASCII name on the wire.
    let resp = h.get("/test/данные.txt").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "данные");
}

#[tokio::test]
async fn test_file_handler_rejects_writes() {
    let h = Harness::start().await;
    let resp = h
        .request(reqwest::Method::POST, "/test/foo/test.txt")
        .body("overwrite")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[reqwest::header::ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn test_head_reports_length_without_body() {
    let h = Harness::start().await;
    let resp = h
        .request(reqwest::Method::HEAD, "/test/foo/test.txt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[reqwest::header::CONTENT_LENGTH], "4");
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_requests() {
    let h = Arc::new(Harness::start().await);

    let mut tasks = Vec::new();
    for i in 0..20 {
        let h = h.clone();
        tasks.push(tokio::spawn(async move {
            let path = if i % 2 == 0 { "/api/test/int" } else { "/test/foo/test.txt" };
            h.get(path).send().await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let root = tempfile::tempdir().unwrap();
    init_fixture(root.path());
    let (addr, shutdown) = start_server(harness_routes(root.path()), test_config(false)).await;
    let client = client();

    let resp = client
        .get(format!("http://{}/api/test", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(client
        .get(format!("http://{}/api/test", addr))
        .send()
        .await
        .is_err());
}
