//! Testing utilities for Ladder.
//!
//! This module provides handlers with predictable behaviour and a small
//! request builder, to make testing apps and middleware easier.
//!
//! # Features
//!
//! - [`Reply`]: ends the response with a fixed status and body
//! - [`Pass`], [`Fail`], [`SkipRoute`]: advance the chain in a fixed way
//! - [`RecordingHandler`]: records what each request looked like when it arrived
//! - [`RecordingErrorHandler`]: records the errors it receives
//! - [`CountingHandler`]: counts invocations
//! - [`TestRequest`] and [`send`]: dispatch a request and get the response back

use bytes::Bytes;
use http::{Method, StatusCode};
use ladder_core::{
    App, BoxError, BoxFuture, ErrorHandler, Handler, HandlerResult, Next, Params, Request,
    Response,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Fixed behaviour
// ============================================================================

/// A handler that ends the response with a fixed status and body.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: Bytes,
}

impl Reply {
    /// Reply `200 OK` with `body`.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Bytes::from(body.into()),
        }
    }

    /// Reply with `status` and an empty body.
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: Bytes::new(),
        }
    }

    /// Replace the status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Handler for Reply {
    fn call<'a>(
        &'a self,
        _req: &'a mut Request,
        res: &'a mut Response,
        _next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            res.set_status(self.status);
            res.send(&self.body);
            Ok(())
        })
    }
}

/// A handler that always advances in normal mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pass;

impl Handler for Pass {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            next.run(req, res).await;
            Ok(())
        })
    }
}

/// A handler that always skips the rest of its verb router.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipRoute;

impl Handler for SkipRoute {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            next.skip_route(req, res).await;
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum FailMode {
    Signal,
    Return,
    Panic,
}

/// A handler that always fails with a fixed message.
#[derive(Debug, Clone)]
pub struct Fail {
    message: String,
    mode: FailMode,
}

impl Fail {
    /// Fail by switching the dispatch to error mode through [`Next::fail`].
    pub fn signal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mode: FailMode::Signal,
        }
    }

    /// Fail by returning `Err` without advancing.
    pub fn returning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mode: FailMode::Return,
        }
    }

    /// Fail by panicking.
    pub fn panicking(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mode: FailMode::Panic,
        }
    }
}

impl Handler for Fail {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            match self.mode {
                FailMode::Signal => {
                    next.fail(req, res, self.message.clone()).await;
                    Ok(())
                }
                FailMode::Return => Err(self.message.clone().into()),
                FailMode::Panic => panic!("{}", self.message),
            }
        })
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// What a request looked like when it reached a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// The request method.
    pub method: Method,
    /// The path relative to the enclosing mount.
    pub path: String,
    /// The path as the outermost app received it.
    pub original_path: String,
    /// Parameters captured by the matching entry.
    pub params: Params,
}

/// A handler that records every request it sees, then advances.
///
/// # Example
///
/// ```rust
/// use ladder_core::App;
/// use ladder_std::testing::{RecordingHandler, send};
/// use http::Method;
///
/// # futures::executor::block_on(async {
/// let recorder = RecordingHandler::new();
/// let app = App::new().at("/users/:id", recorder.clone());
///
/// send(&app, Method::GET, "/users/7/posts").await;
///
/// let seen = recorder.records();
/// assert_eq!(seen.len(), 1);
/// assert_eq!(seen[0].params.get("id"), Some("7"));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    records: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingHandler {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded requests.
    pub fn records(&self) -> Vec<Recorded> {
        self.records.lock().unwrap().clone()
    }

    /// Get the recorded paths, relative to the enclosing mount.
    pub fn paths(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.path.clone())
            .collect()
    }

    /// Get the number of recorded requests.
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Clear all recorded requests.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

impl Handler for RecordingHandler {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            self.records.lock().unwrap().push(Recorded {
                method: req.method().clone(),
                path: req.path().to_owned(),
                original_path: req.original_path().to_owned(),
                params: req.params().clone(),
            });
            next.run(req, res).await;
            Ok(())
        })
    }
}

// ============================================================================
// Recording Error Handler
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    PassOn,
    Recover,
    Respond,
}

/// An error handler that records the message of every error it receives.
///
/// By default it passes the error on unchanged.
#[derive(Debug, Clone)]
pub struct RecordingErrorHandler {
    messages: Arc<Mutex<Vec<String>>>,
    disposition: Disposition,
}

impl RecordingErrorHandler {
    /// Record, then pass the error on.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            disposition: Disposition::PassOn,
        }
    }

    /// Record, then continue in normal mode.
    pub fn recovering(mut self) -> Self {
        self.disposition = Disposition::Recover;
        self
    }

    /// Record, then end the response with the error message as body.
    pub fn responding(mut self) -> Self {
        self.disposition = Disposition::Respond;
        self
    }

    /// Get the recorded error messages.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Get the number of recorded errors.
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl Default for RecordingErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler for RecordingErrorHandler {
    fn call<'a>(
        &'a self,
        error: BoxError,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let message = error.to_string();
            self.messages.lock().unwrap().push(message.clone());
            match self.disposition {
                Disposition::PassOn => next.fail(req, res, error).await,
                Disposition::Recover => next.run(req, res).await,
                Disposition::Respond => res.send(message),
            }
            Ok(())
        })
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations, then advances.
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the count to zero.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Handler for CountingHandler {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            self.count.fetch_add(1, Ordering::SeqCst);
            next.run(req, res).await;
            Ok(())
        })
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A request builder for tests.
#[derive(Debug)]
pub struct TestRequest {
    request: Request,
}

impl TestRequest {
    /// Start a request with `method` for `target`.
    pub fn new(method: Method, target: &str) -> Self {
        Self {
            request: Request::new(method, target),
        }
    }

    /// Start a `GET` request.
    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    /// Start a `POST` request.
    pub fn post(target: &str) -> Self {
        Self::new(Method::POST, target)
    }

    /// Add a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request = self.request.with_body(body);
        self
    }

    /// Dispatch through `app`, returning the response.
    pub async fn send(self, app: &App) -> Response {
        self.exchange(app).await.1
    }

    /// Dispatch through `app`, returning the request as dispatch left it
    /// together with the response.
    pub async fn exchange(self, app: &App) -> (Request, Response) {
        let mut req = self.request;
        let mut res = Response::new();
        app.handle(&mut req, &mut res).await;
        (req, res)
    }
}

/// Dispatch a bodiless request through `app`.
pub async fn send(app: &App, method: Method, target: &str) -> Response {
    TestRequest::new(method, target).send(app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reply() {
        let app = App::new().with(Reply::text("teapot").with_status(StatusCode::IM_A_TEAPOT));

        let res = send(&app, Method::GET, "/").await;
        assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(res.body_text(), "teapot");
        assert!(res.is_ended());
    }

    #[tokio::test]
    async fn test_recording_handler_sees_params() {
        let recorder = RecordingHandler::new();
        let app = App::new().at("/users/:id", recorder.clone());

        send(&app, Method::GET, "/users/7").await;
        send(&app, Method::GET, "/teams/7").await;

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, Method::GET);
        assert_eq!(records[0].params.get("id"), Some("7"));
    }

    #[tokio::test]
    async fn test_fail_modes_reach_error_handler() {
        for fail in [
            Fail::signal("boom"),
            Fail::returning("boom"),
            Fail::panicking("boom"),
        ] {
            let errors = RecordingErrorHandler::new().responding();
            let app = App::new().with(fail).catch(errors.clone());

            let res = send(&app, Method::GET, "/").await;
            assert_eq!(errors.count(), 1);
            assert!(res.body_text().contains("boom"));
        }
    }

    #[tokio::test]
    async fn test_counting_handler() {
        let counter = CountingHandler::new();
        let app = App::new().with(counter.clone()).with(counter.clone());

        send(&app, Method::GET, "/").await;
        assert_eq!(counter.count(), 2);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_exchange_returns_request() {
        let app = App::new().with(Pass);
        let (req, res) = TestRequest::post("/submit?draft=1")
            .header("content-type", "text/plain")
            .body("hello")
            .exchange(&app)
            .await;

        assert_eq!(req.query(), Some("draft=1"));
        assert_eq!(req.body().as_ref(), b"hello");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
