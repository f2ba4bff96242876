//! Method-filtered handler lists.
//!
//! A [`VerbRouter`] is registered at a terminal path and holds an ordered
//! list of `(verb, handler)` pairs. Only pairs whose verb accepts the request
//! method run; once the list is exhausted, control returns to the stack the
//! router is registered in.
//!
//! ```rust
//! use ladder_core::{App, VerbRouter, handler_fn};
//!
//! let users = VerbRouter::new()
//!     .get(handler_fn(|_req, res, _next| {
//!         Box::pin(async move {
//!             res.send("list");
//!             Ok(())
//!         })
//!     }))
//!     .post(handler_fn(|_req, res, _next| {
//!         Box::pin(async move {
//!             res.send("create");
//!             Ok(())
//!         })
//!     }));
//!
//! let app = App::new().route("/users", users);
//! # let _ = app;
//! ```

use crate::{
    error::HandlerResult,
    handler::Handler,
    next::{Next, Signal},
    request::Request,
    response::Response,
};
use futures::future::BoxFuture;
use http::Method;
use std::{fmt, sync::Arc};

/// The method filter of one verb router pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    /// Accept every method.
    Any,
    /// Accept one method, compared ASCII case-insensitively.
    Method(Method),
}

impl Verb {
    /// Whether a request with `method` runs this pair.
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            Verb::Any => true,
            Verb::Method(verb) => verb.as_str().eq_ignore_ascii_case(method.as_str()),
        }
    }

    /// The verb name, `*` for [`Verb::Any`].
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Any => "*",
            Verb::Method(method) => method.as_str(),
        }
    }
}

impl From<Method> for Verb {
    fn from(method: Method) -> Self {
        Verb::Method(method)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered list of method-filtered handlers.
#[derive(Clone, Default)]
pub struct VerbRouter {
    pub(crate) verbs: Vec<(Verb, Arc<dyn Handler>)>,
}

macro_rules! verb_methods {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name<H: Handler>(self, handler: H) -> Self {
                self.on(Method::$method, handler)
            }
        )*
    };
}

impl VerbRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn on<H: Handler>(mut self, verb: impl Into<Verb>, handler: H) -> Self {
        self.verbs.push((verb.into(), Arc::new(handler)));
        self
    }

    /// Append a pair that accepts every method.
    pub fn all<H: Handler>(self, handler: H) -> Self {
        self.on(Verb::Any, handler)
    }

    verb_methods! {
        /// Append a `GET` pair.
        get => GET;
        /// Append a `POST` pair.
        post => POST;
        /// Append a `PUT` pair.
        put => PUT;
        /// Append a `DELETE` pair.
        delete => DELETE;
        /// Append a `PATCH` pair.
        patch => PATCH;
        /// Append a `HEAD` pair.
        head => HEAD;
        /// Append an `OPTIONS` pair.
        options => OPTIONS;
        /// Append a `TRACE` pair.
        trace => TRACE;
        /// Append a `CONNECT` pair.
        connect => CONNECT;
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// Check if no pair is registered.
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// The registered verbs, in order.
    pub fn verbs(&self) -> impl Iterator<Item = &Verb> {
        self.verbs.iter().map(|(verb, _)| verb)
    }
}

impl Handler for VerbRouter {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            Next::verbs(&self.verbs, &next)
                .resume(req, res, Signal::Continue)
                .await;
            Ok(())
        })
    }
}

impl fmt::Debug for VerbRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.verbs()).finish()
    }
}
