//! Time-limited handler execution.

use ladder_core::{BoxFuture, DispatchError, Handler, HandlerResult, Next, Request, Response};
use std::time::Duration;
use tokio::time::timeout;

/// A handler wrapper that bounds the inner handler with a deadline.
///
/// The deadline covers everything the inner handler advances into. When it
/// expires before the inner handler advanced, the dispatch switches to error
/// mode with [`DispatchError::Timeout`]; after advancing, the timeout is only
/// logged.
pub struct Timeout<H> {
    inner: H,
    duration: Duration,
}

impl<H> Timeout<H> {
    /// Bound `inner` by `duration`.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<H: Handler> Handler for Timeout<H> {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            match timeout(self.duration, self.inner.call(req, res, next)).await {
                Ok(result) => result,
                Err(_) => Err(DispatchError::Timeout(self.duration).into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingErrorHandler, Reply, send};
    use http::{Method, StatusCode};
    use ladder_core::{App, handler_fn};

    fn sleeper(duration: Duration) -> impl Handler {
        handler_fn(move |_req, res, _next| {
            Box::pin(async move {
                tokio::time::sleep(duration).await;
                res.send("slow");
                Ok(())
            })
        })
    }

    #[tokio::test]
    async fn test_within_deadline() {
        let app = App::new().with(Timeout::new(Reply::text("fast"), Duration::from_millis(50)));

        let res = send(&app, Method::GET, "/").await;
        assert_eq!(res.body_text(), "fast");
    }

    #[tokio::test]
    async fn test_expired_deadline_is_an_error() {
        let errors = RecordingErrorHandler::new();
        let app = App::new()
            .with(Timeout::new(
                sleeper(Duration::from_secs(5)),
                Duration::from_millis(10),
            ))
            .catch(errors.clone());

        let res = send(&app, Method::GET, "/").await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(errors.messages(), vec!["handler timed out after 10ms"]);
    }
}
