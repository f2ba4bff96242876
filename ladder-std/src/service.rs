//! Tower integration for Ladder.
//!
//! This module provides adapters between Ladder apps and tower's `Service`
//! trait, in both directions:
//!
//! - [`AppService`] serves an [`App`] as a `Service<http::Request<Bytes>>`
//! - [`ServiceHandler`] uses a tower service as the final handler of a route
//!
//! # Example
//!
//! ```rust
//! use ladder_core::App;
//! use ladder_std::{service::AppService, testing::Reply};
//!
//! let service = AppService::new(App::new().get("/", Reply::text("hello")));
//! // Now usable with tower middleware and any tower-compatible server.
//! # let _ = service;
//! ```

use bytes::Bytes;
use ladder_core::{App, BoxError, BoxFuture, Handler, HandlerResult, Next, Request, Response};
use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Service, ServiceExt};

// ============================================================================
// App → Service Adapter
// ============================================================================

/// Serves an [`App`] as a tower `Service`.
///
/// Dispatch never fails at the service level: unhandled errors become `500`
/// responses and unmatched requests `404` responses.
#[derive(Debug, Clone)]
pub struct AppService {
    app: Arc<App>,
}

impl AppService {
    /// Create a service owning `app`.
    pub fn new(app: App) -> Self {
        Self::from_shared(Arc::new(app))
    }

    /// Create a service over an already shared app.
    pub fn from_shared(app: Arc<App>) -> Self {
        Self { app }
    }

    /// Get a reference to the inner app.
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Service<http::Request<Bytes>> for AppService {
    type Response = http::Response<Bytes>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        let app = Arc::clone(&self.app);
        Box::pin(async move { Ok(app.respond(request).await) })
    }
}

// ============================================================================
// Service → Handler Adapter
// ============================================================================

/// Uses a tower `Service` as a handler.
///
/// The service receives the request with its path relative to the enclosing
/// mount, and its response ends the Ladder response. A service error switches
/// the dispatch to error mode.
#[derive(Debug, Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    /// Wrap `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Get a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.service
    }
}

impl<S> Handler for ServiceHandler<S>
where
    S: Service<http::Request<Bytes>, Response = http::Response<Bytes>>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        _next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(forward(self.service.clone(), req, res))
    }
}

async fn forward<S>(service: S, req: &mut Request, res: &mut Response) -> HandlerResult
where
    S: Service<http::Request<Bytes>, Response = http::Response<Bytes>>,
    S::Error: Into<BoxError>,
{
    let target = match req.query() {
        Some(query) => format!("{}?{}", req.path(), query),
        None => req.path().to_owned(),
    };
    let mut request = http::Request::builder()
        .method(req.method().clone())
        .uri(target)
        .body(req.body().clone())?;
    *request.headers_mut() = req.headers().clone();

    let response = service
        .oneshot(request)
        .await
        .map_err(Into::<BoxError>::into)?;

    let (parts, body) = response.into_parts();
    res.set_status(parts.status);
    *res.headers_mut() = parts.headers;
    res.send(body);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
