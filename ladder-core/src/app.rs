//! # Dispatcher
//!
//! An [`App`] is an ordered stack of entries. Each entry pairs a compiled
//! [`PathMatcher`] with a kind-tagged [`Layer`]; registration order is
//! precedence.
//!
//! # Registration
//!
//! | Method                               | Kind   | Match    |
//! |--------------------------------------|--------|----------|
//! | [`App::at`] / [`App::with`]          | normal | prefix   |
//! | [`App::catch_at`] / [`App::catch`]   | error  | prefix   |
//! | [`App::mount`] / [`App::mount_root`] | normal | prefix   |
//! | [`App::route`], verb sugar           | normal | terminal |
//!
//! The builder consumes the app, so once an app is shared for dispatch its
//! stack can no longer change.
//!
//! # Mounting
//!
//! A mounted app sees paths relative to its mount point: entering it strips
//! exactly the raw prefix the mount pattern consumed (keeping a leading
//! `/`), and leaving it, by exhausting its stack, restores the path before
//! the parent carries on.
//!
//! ```rust
//! use ladder_core::{App, Request, Response, handler_fn};
//! use http::Method;
//!
//! # futures::executor::block_on(async {
//! let api = App::new().get("/users/:id", handler_fn(|req, res, _next| {
//!     Box::pin(async move {
//!         let body = format!("{} as {}", req.param("id").unwrap_or("?"), req.path());
//!         res.send(body);
//!         Ok(())
//!     })
//! }));
//! let app = App::new().mount("/api", api);
//!
//! let mut req = Request::new(Method::GET, "/api/users/7");
//! let mut res = Response::new();
//! app.handle(&mut req, &mut res).await;
//!
//! assert_eq!(res.body_text(), "7 as /users/7");
//! assert_eq!(req.path(), "/api/users/7");
//! # });
//! ```

use crate::{
    error::HandlerResult,
    handler::{ErrorHandler, Handler, Layer},
    next::{Exit, Next, Signal},
    path::{MatchOptions, PathMatcher, remainder},
    request::Request,
    response::Response,
    terminal::{DefaultTerminal, Terminal},
    verb::{Verb, VerbRouter},
};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::Method;
use std::fmt;

/// One registered stack entry.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) matcher: PathMatcher,
    pub(crate) layer: Layer,
}

/// An ordered stack of path-matched handlers.
#[derive(Clone, Default)]
pub struct App {
    entries: Vec<Entry>,
    case_sensitive: bool,
}

macro_rules! verb_routes {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name<H: Handler>(self, path: &str, handler: H) -> Self {
                self.on(Method::$method, path, handler)
            }
        )*
    };
}

impl App {
    /// Create an app with an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare literal segments case-sensitively in entries registered after
    /// this call.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Append an entry. The general form behind every other registration
    /// method.
    pub fn layer(mut self, path: &str, layer: Layer, terminal: bool) -> Self {
        let options = MatchOptions {
            terminal,
            case_sensitive: self.case_sensitive,
        };
        tracing::trace!(path, kind = ?layer.kind(), terminal, "registering entry");
        self.entries.push(Entry {
            matcher: PathMatcher::new(path, options),
            layer,
        });
        self
    }

    /// Append a normal handler, prefix-matched at `path`.
    pub fn at<H: Handler>(self, path: &str, handler: H) -> Self {
        self.layer(path, Layer::normal(handler), false)
    }

    /// Append a normal handler that sees every request.
    pub fn with<H: Handler>(self, handler: H) -> Self {
        self.at("/", handler)
    }

    /// Append an error handler, prefix-matched at `path`.
    pub fn catch_at<H: ErrorHandler>(self, path: &str, handler: H) -> Self {
        self.layer(path, Layer::error(handler), false)
    }

    /// Append an error handler that sees every failed request.
    pub fn catch<H: ErrorHandler>(self, handler: H) -> Self {
        self.catch_at("/", handler)
    }

    /// Mount `app` at `path`.
    pub fn mount(self, path: &str, app: App) -> Self {
        self.at(path, Mounted { app })
    }

    /// Mount `app` at the root: it sees every request, with the path
    /// unchanged.
    pub fn mount_root(self, app: App) -> Self {
        self.mount("/", app)
    }

    /// Append a verb router, matched against the whole path.
    pub fn route(self, path: &str, router: VerbRouter) -> Self {
        self.layer(path, Layer::normal(router), true)
    }

    /// Append a fresh verb router at `path` holding a single pair.
    pub fn on<H: Handler>(self, verb: impl Into<Verb>, path: &str, handler: H) -> Self {
        self.route(path, VerbRouter::new().on(verb, handler))
    }

    /// Append a fresh verb router at `path` that accepts every method.
    pub fn all<H: Handler>(self, path: &str, handler: H) -> Self {
        self.on(Verb::Any, path, handler)
    }

    verb_routes! {
        /// Append a fresh verb router at `path` for `GET`.
        get => GET;
        /// Append a fresh verb router at `path` for `POST`.
        post => POST;
        /// Append a fresh verb router at `path` for `PUT`.
        put => PUT;
        /// Append a fresh verb router at `path` for `DELETE`.
        delete => DELETE;
        /// Append a fresh verb router at `path` for `PATCH`.
        patch => PATCH;
        /// Append a fresh verb router at `path` for `HEAD`.
        head => HEAD;
        /// Append a fresh verb router at `path` for `OPTIONS`.
        options => OPTIONS;
        /// Append a fresh verb router at `path` for `TRACE`.
        trace => TRACE;
        /// Append a fresh verb router at `path` for `CONNECT`.
        connect => CONNECT;
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispatch one request through the stack, handing an exhausted dispatch
    /// to `terminal`.
    pub async fn dispatch(
        &self,
        req: &mut Request,
        res: &mut Response,
        terminal: &dyn Terminal,
    ) {
        tracing::debug!(method = %req.method(), path = %req.path(), "dispatching");
        let exit = Exit::Terminal(terminal);
        Next::stack(&self.entries, &exit)
            .resume(req, res, Signal::Continue)
            .await;
    }

    /// Dispatch one request, finishing with [`DefaultTerminal`].
    pub async fn handle(&self, req: &mut Request, res: &mut Response) {
        self.dispatch(req, res, &DefaultTerminal).await;
    }

    /// Dispatch a transport-level request and convert the outcome back.
    ///
    /// A dispatch that completes without anyone ending the response is sent
    /// as it stands, with a warning.
    pub async fn respond(&self, request: http::Request<Bytes>) -> http::Response<Bytes> {
        let mut req = Request::from_http(request);
        let mut res = Response::new();
        self.handle(&mut req, &mut res).await;
        if !res.is_ended() {
            tracing::warn!(
                method = %req.method(),
                path = %req.original_path(),
                "dispatch completed without ending the response"
            );
        }
        res.into_http()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in &self.entries {
            list.entry(&(entry.matcher.pattern(), entry.layer.kind()));
        }
        list.finish()
    }
}

/// A nested app, registered through [`App::mount`].
struct Mounted {
    app: App,
}

impl Handler for Mounted {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let original_path = req.path().to_owned();
            req.set_path(remainder(&original_path, req.matched_end()));
            tracing::trace!(from = %original_path, to = %req.path(), "entering mounted app");

            let exit = Exit::Parent {
                original_path,
                parent: next,
            };
            Next::stack(&self.app.entries, &exit)
                .resume(&mut *req, &mut *res, Signal::Continue)
                .await;

            if let Exit::Parent { original_path, .. } = exit {
                req.set_path(original_path);
            }
            Ok(())
        })
    }
}
