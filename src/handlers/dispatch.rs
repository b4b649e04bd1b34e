//! Method dispatch into a handler's capability set.
//!
//! # Responsibilities
//! - Check the capability explicitly before invoking it
//! - Serve HEAD from GET when the handler has no HEAD of its own
//! - Contain handler panics at the dispatch boundary

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::handlers::{ApiRequest, Handler, HandlerError, HandlerResult, Method, Payload};
use crate::http::error::DispatchError;

/// Capability the handler will actually run for `method`.
fn effective_method(handler: &dyn Handler, method: Method) -> Method {
    match method {
        Method::Head if !handler.supports(Method::Head) => Method::Get,
        other => other,
    }
}

/// Invoke `method` on `handler`, or report which methods it does accept.
///
/// Used both at the top of the request lifecycle and by composite handlers
/// forwarding to their children.
pub fn invoke(handler: &dyn Handler, method: Method, request: &ApiRequest) -> HandlerResult {
    let method = effective_method(handler, method);
    if !handler.supports(method) {
        return Err(HandlerError::MethodNotAllowed {
            allowed: handler.allowed_methods(),
        });
    }
    handler.call(method, request)
}

/// Top-level dispatch. Panics become internal errors; the server keeps running.
pub fn dispatch(
    handler: &dyn Handler,
    method: Method,
    request: &ApiRequest,
) -> Result<Payload, DispatchError> {
    match catch_unwind(AssertUnwindSafe(|| invoke(handler, method, request))) {
        Ok(result) => result.map_err(DispatchError::from),
        Err(panic) => Err(DispatchError::Internal(anyhow::anyhow!(
            "handler panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
