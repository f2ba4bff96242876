//! Span instrumentation for handlers.

use ladder_core::{BoxFuture, Handler, HandlerResult, Next, Request, Response};
use tracing::Instrument;

/// Header carrying a caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A handler wrapper that runs the inner handler inside a `tracing` span.
///
/// Everything the inner handler advances into runs inside the span as well,
/// so wrapping the first middleware of an app instruments the whole request.
/// The span carries the `x-request-id` header when the request has one.
pub struct Traced<H> {
    inner: H,
    name: &'static str,
}

impl<H> Traced<H> {
    /// Wrap `inner` in a span labelled `name`.
    pub const fn new(inner: H, name: &'static str) -> Self {
        Self { inner, name }
    }
}

impl<H: Clone> Clone for Traced<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<H: Handler> Handler for Traced<H> {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        let span = match request_id {
            Some(request_id) => tracing::info_span!(
                "request",
                handler = %self.name,
                method = %req.method(),
                path = %req.path(),
                request_id = %request_id,
            ),
            None => tracing::info_span!(
                "request",
                handler = %self.name,
                method = %req.method(),
                path = %req.path(),
            ),
        };

        Box::pin(self.inner.call(req, res, next).instrument(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingHandler, Reply, TestRequest};
    use ladder_core::App;

    #[tokio::test]
    async fn test_traced_runs_inner_and_chain() {
        let counter = CountingHandler::new();
        let app = App::new()
            .with(Traced::new(counter.clone(), "count"))
            .with(Reply::text("after"));

        let res = TestRequest::get("/")
            .header(REQUEST_ID_HEADER, "req-42")
            .send(&app)
            .await;

        assert_eq!(counter.count(), 1);
        assert_eq!(res.body_text(), "after");
    }
}
