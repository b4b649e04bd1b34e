//! Response encoding.
//!
//! # Responsibilities
//! - Turn a handler payload or a dispatch error into (status, content-type, body)
//! - Keep internal failure detail out of response bodies
//! - Strip bodies from HEAD responses while keeping their length
//!
//! # Design Decisions
//! - Numbers are encoded as JSON (`application/json`), the same as trees
//! - JSON is written as UTF-8 with non-ASCII text kept literal
//! - Error bodies are plain text so they read the same in a browser and curl

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::handlers::{Method, Payload};
use crate::http::error::DispatchError;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

/// Wire-ready response: status, content type, extra headers and body.
#[derive(Debug, Clone)]
pub struct EncodedResponse {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl EncodedResponse {
    pub fn new(status: StatusCode, content_type: Option<&'static str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    fn plain(status: StatusCode, message: impl Into<Bytes>) -> Self {
        Self::new(status, Some(TEXT_PLAIN), message)
    }

    /// Drop the body but keep its length, for HEAD requests.
    pub fn without_body(mut self) -> Self {
        if self.status != StatusCode::NO_CONTENT {
            self.headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        }
        self.body = Bytes::new();
        self
    }

    pub fn body_text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

impl IntoResponse for EncodedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response.headers_mut().extend(self.headers);
        response
    }
}

/// Encode the outcome of a dispatch.
pub fn encode(outcome: Result<Payload, DispatchError>) -> EncodedResponse {
    match outcome {
        Ok(payload) => encode_payload(payload),
        Err(err) => encode_error(&err),
    }
}

pub fn encode_payload(payload: Payload) -> EncodedResponse {
    match payload {
        Payload::Empty => EncodedResponse::new(StatusCode::NO_CONTENT, None, Bytes::new()),
        Payload::Bytes(bytes) => EncodedResponse::new(StatusCode::OK, Some(OCTET_STREAM), bytes),
        Payload::Text(text) => EncodedResponse::new(StatusCode::OK, Some(TEXT_HTML), text),
        Payload::Json(value) => match serde_json::to_vec(&value) {
            Ok(body) => EncodedResponse::new(StatusCode::OK, Some(APPLICATION_JSON), body),
            Err(e) => encode_error(&DispatchError::Internal(e.into())),
        },
        Payload::Integer(n) => {
            EncodedResponse::new(StatusCode::OK, Some(APPLICATION_JSON), n.to_string())
        }
        Payload::Float(n) => match serde_json::Number::from_f64(n) {
            Some(number) => {
                EncodedResponse::new(StatusCode::OK, Some(APPLICATION_JSON), number.to_string())
            }
            None => encode_error(&DispatchError::Internal(anyhow::anyhow!(
                "float {} has no JSON representation",
                n
            ))),
        },
        Payload::File {
            content_type,
            bytes,
        } => EncodedResponse::new(StatusCode::OK, Some(content_type), bytes),
    }
}

/// Encode a failure. Domain messages are rendered as-is; everything else gets
/// a fixed reason phrase.
pub fn encode_error(err: &DispatchError) -> EncodedResponse {
    match err {
        DispatchError::Domain(e) => EncodedResponse::plain(e.status(), e.message().to_string()),
        DispatchError::NoRoute(_) => EncodedResponse::plain(StatusCode::NOT_FOUND, "Not Found"),
        DispatchError::Unauthorized => {
            EncodedResponse::plain(StatusCode::UNAUTHORIZED, "Unauthorized")
        }
        DispatchError::MethodNotAllowed { allowed } => {
            let mut response =
                EncodedResponse::plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            if let Ok(value) = HeaderValue::from_str(&allow_header(allowed)) {
                response.headers.insert(header::ALLOW, value);
            }
            response
        }
        DispatchError::Internal(_) => {
            EncodedResponse::plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn allow_header(allowed: &[Method]) -> String {
    allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
