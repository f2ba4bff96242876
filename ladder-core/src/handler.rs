//! # Handlers
//!
//! Everything a stack entry can invoke implements one of two traits:
//!
//! - [`Handler`]: a normal handler, `(request, response, next)`. Invoked only
//!   while no error is active.
//! - [`ErrorHandler`]: an error handler, `(error, request, response, next)`.
//!   Invoked only while an error is active.
//!
//! The kind is fixed at registration time by wrapping the handler in the
//! matching [`Layer`] variant. The engine never inspects a handler to guess
//! its kind.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `handler_fn(|req, res, next| Box::pin(async move { ... }))`
//! 2. **Struct implementation**: `impl Handler for MyMiddleware`
//! 3. **Composition**: [`App`] (through [`App::mount`]) and [`VerbRouter`]
//!    are handlers themselves, so stacks nest structurally.
//!
//! A handler either finishes the response, or hands control on through its
//! [`Next`]. Returning `Err` before advancing is the same as calling
//! [`Next::fail`] with that error; so is panicking.
//!
//! [`App`]: crate::App
//! [`App::mount`]: crate::App::mount
//! [`VerbRouter`]: crate::VerbRouter

use crate::{
    error::{BoxError, HandlerResult},
    next::Next,
    request::Request,
    response::Response,
};
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};

/// A normal request handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Handler`",
    label = "missing `Handler` implementation",
    note = "wrap closures with `handler_fn`, or implement `Handler::call` directly"
)]
pub trait Handler: Send + Sync + 'static {
    /// Handle a request, optionally advancing the chain through `next`.
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult>;
}

/// An error handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `ErrorHandler`",
    label = "missing `ErrorHandler` implementation",
    note = "wrap closures with `error_handler_fn`, or implement `ErrorHandler::call` directly"
)]
pub trait ErrorHandler: Send + Sync + 'static {
    /// Handle `error`. Call [`Next::run`] to recover, or [`Next::fail`] to
    /// pass the error on.
    fn call<'a>(
        &'a self,
        error: BoxError,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult>;
}

/// A [`Handler`] backed by a closure. Created by [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a [`Handler`].
///
/// ```rust
/// use ladder_core::{App, handler_fn};
///
/// let app = App::new().with(handler_fn(|_req, res, _next| {
///     Box::pin(async move {
///         res.send("hello");
///         Ok(())
///     })
/// }));
/// # let _ = app;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        (self.f)(req, res, next)
    }
}

/// An [`ErrorHandler`] backed by a closure. Created by [`error_handler_fn`].
#[derive(Clone)]
pub struct ErrorHandlerFn<F> {
    f: F,
}

/// Wrap a closure as an [`ErrorHandler`].
pub fn error_handler_fn<F>(f: F) -> ErrorHandlerFn<F>
where
    F: for<'a> Fn(
            BoxError,
            &'a mut Request,
            &'a mut Response,
            Next<'a>,
        ) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    ErrorHandlerFn { f }
}

impl<F> ErrorHandler for ErrorHandlerFn<F>
where
    F: for<'a> Fn(
            BoxError,
            &'a mut Request,
            &'a mut Response,
            Next<'a>,
        ) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        error: BoxError,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        (self.f)(error, req, res, next)
    }
}

/// Which dispatch mode a registered handler takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Invoked while no error is active.
    Normal,
    /// Invoked while an error is active.
    ErrorHandling,
}

/// A handler tagged with its kind.
#[derive(Clone)]
pub enum Layer {
    /// A normal handler.
    Normal(Arc<dyn Handler>),
    /// An error handler.
    Error(Arc<dyn ErrorHandler>),
}

impl Layer {
    /// Tag a normal handler.
    pub fn normal<H: Handler>(handler: H) -> Self {
        Layer::Normal(Arc::new(handler))
    }

    /// Tag an error handler.
    pub fn error<H: ErrorHandler>(handler: H) -> Self {
        Layer::Error(Arc::new(handler))
    }

    /// The dispatch mode this layer takes part in.
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Normal(_) => LayerKind::Normal,
            Layer::Error(_) => LayerKind::ErrorHandling,
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Layer").field(&self.kind()).finish()
    }
}
