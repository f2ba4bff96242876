//! What happens when a dispatch falls off the end of the outermost stack.

use crate::{error::BoxError, request::Request, response::Response};
use http::StatusCode;

/// The continuation of the outermost app.
///
/// Invoked at most once per dispatch, with the error that was still active
/// when the stack ran out (if any).
pub trait Terminal: Send + Sync {
    /// Finish the dispatch.
    fn finish(&self, error: Option<BoxError>, req: &mut Request, res: &mut Response);
}

/// Ends the response with `500` when an error is active, `404` otherwise.
///
/// The error itself is logged and never written to the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTerminal;

impl Terminal for DefaultTerminal {
    fn finish(&self, error: Option<BoxError>, req: &mut Request, res: &mut Response) {
        let status = match &error {
            Some(error) => {
                tracing::error!(
                    method = %req.method(),
                    path = %req.original_path(),
                    error = %error,
                    "unhandled error"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
            None => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.original_path(),
                    "no handler finished the request"
                );
                StatusCode::NOT_FOUND
            }
        };

        if res.is_ended() {
            tracing::warn!(%status, "response already ended, terminal status dropped");
            return;
        }
        res.set_status(status).end();
    }
}

impl<F> Terminal for F
where
    F: Fn(Option<BoxError>, &mut Request, &mut Response) + Send + Sync,
{
    fn finish(&self, error: Option<BoxError>, req: &mut Request, res: &mut Response) {
        self(error, req, res)
    }
}
