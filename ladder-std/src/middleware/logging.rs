//! Request logging middleware.

use ladder_core::{BoxFuture, Handler, HandlerResult, Next, Request, Response};
use std::time::Instant;

/// Logs every request on the way in and its status on the way out.
///
/// Register it first so that it sees the final status of every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl Handler for Logger {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let started = Instant::now();
            let method = req.method().clone();
            let path = req.original_path().to_owned();
            tracing::info!(%method, %path, "request");

            next.run(req, res).await;

            tracing::info!(
                %method,
                %path,
                status = res.status().as_u16(),
                ended = res.is_ended(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "response"
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, send};
    use http::{Method, StatusCode};
    use ladder_core::App;

    #[tokio::test]
    async fn test_logger_passes_through() {
        let app = App::new().with(Logger).get("/hello", Reply::text("hi"));

        let res = send(&app, Method::GET, "/hello").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body_text(), "hi");

        let res = send(&app, Method::GET, "/nope").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
