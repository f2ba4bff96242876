#![allow(dead_code)]

use ladder::{
    BoxError, ErrorHandler, Handler, error_handler_fn, handler_fn, http::Method,
    testing::TestRequest,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Order Log
// ============================================================================

/// Shared log of which handler saw which path, in invocation order.
#[derive(Clone, Default)]
pub struct Log {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Logs `name:path`, then advances.
pub fn note(log: &Log, name: &'static str) -> impl Handler {
    let log = log.clone();
    handler_fn(move |req, res, next| {
        log.push(format!("{name}:{}", req.path()));
        Box::pin(async move {
            next.run(req, res).await;
            Ok(())
        })
    })
}

/// Ends the response with `prefix` followed by the path the handler saw.
pub fn echo_path(prefix: &'static str) -> impl Handler {
    handler_fn(move |req, res, _next| {
        Box::pin(async move {
            let body = format!("{prefix}{}", req.path());
            res.send(body);
            Ok(())
        })
    })
}

/// Ends the response with the value of parameter `name`, or `undefined`.
pub fn echo_param(name: &'static str) -> impl Handler {
    handler_fn(move |req, res, _next| {
        Box::pin(async move {
            let body = req.param(name).unwrap_or("undefined").to_owned();
            res.send(body);
            Ok(())
        })
    })
}

/// Never advances and never ends the response.
pub fn stall() -> impl Handler {
    handler_fn(|_req, _res, _next| Box::pin(async { Ok(()) }))
}

/// Ends the response with the error message.
pub fn echo_error() -> impl ErrorHandler {
    error_handler_fn(|error: BoxError, _req, res, _next| {
        Box::pin(async move {
            res.send(error.to_string());
            Ok(())
        })
    })
}

/// Ends the response with a fixed body, ignoring the error.
pub fn handled(body: &'static str) -> impl ErrorHandler {
    error_handler_fn(move |_error, _req, res, _next| {
        Box::pin(async move {
            res.send(body);
            Ok(())
        })
    })
}

// ============================================================================
// Requests
// ============================================================================

pub fn get(path: &str) -> TestRequest {
    TestRequest::new(Method::GET, path)
}

pub fn request(method: &str, path: &str) -> TestRequest {
    TestRequest::new(Method::from_bytes(method.as_bytes()).unwrap(), path)
}
