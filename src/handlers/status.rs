//! Built-in status endpoint, mounted by the binary under the API prefix.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::handlers::{ApiRequest, Handler, HandlerResult, Method, Payload};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub status_requests: usize,
}

/// Reports version and uptime. GET only.
pub struct StatusHandler {
    started: Instant,
    requests: AtomicUsize,
}

impl StatusHandler {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests: AtomicUsize::new(0),
        }
    }
}

impl Default for StatusHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for StatusHandler {
    fn supports(&self, method: Method) -> bool {
        method == Method::Get
    }

    fn get(&self, _request: &ApiRequest) -> HandlerResult {
        let count = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        Payload::json(&SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            uptime_secs: self.started.elapsed().as_secs(),
            status_requests: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_and_counts() {
        let h = StatusHandler::new();
        h.get(&ApiRequest::default()).unwrap();
        match h.get(&ApiRequest::default()).unwrap() {
            Payload::Json(v) => {
                assert_eq!(v["status"], "operational");
                assert_eq!(v["status_requests"], 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
