//! # ladder - Ordered Middleware and Routing for HTTP
//!
//! `ladder` dispatches each request through an ordered stack of handlers.
//! Every handler matches a path pattern, and decides whether to finish the
//! response or hand control on. Errors switch the dispatch to error handlers;
//! apps mount inside apps.
//!
//! ## Quick Start
//!
//! ```rust
//! use ladder::prelude::*;
//! use ladder::http::Method;
//!
//! # futures::executor::block_on(async {
//! let app = App::new()
//!     .with(handler_fn(|req, res, next| {
//!         Box::pin(async move {
//!             res.set_header("x-powered-by", "ladder".parse().unwrap());
//!             next.run(req, res).await;
//!             Ok(())
//!         })
//!     }))
//!     .get("/hello/:name", handler_fn(|req, res, _next| {
//!         Box::pin(async move {
//!             let greeting = format!("hello, {}", req.param("name").unwrap_or("stranger"));
//!             res.send(greeting);
//!             Ok(())
//!         })
//!     }));
//!
//! let mut req = Request::new(Method::GET, "/hello/world");
//! let mut res = Response::new();
//! app.handle(&mut req, &mut res).await;
//!
//! assert_eq!(res.body_text(), "hello, world");
//! assert_eq!(res.headers()["x-powered-by"], "ladder");
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): request logging and span middleware
//! - `timeout`: [`middleware::Timeout`]
//! - `tower`: [`service::AppService`] and [`service::ServiceHandler`]
//! - `server`: [`server::listen`] over hyper

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use ladder_core::{
    // Dispatch
    App,
    // Error types
    BoxError,
    BoxFuture,
    DefaultTerminal,
    DispatchError,
    // Handlers
    ErrorHandler,
    ErrorHandlerFn,
    Handler,
    HandlerFn,
    HandlerResult,
    Layer,
    LayerKind,
    // Path matching
    MatchOptions,
    Next,
    // Request / Response
    Params,
    PathMatch,
    PathMatcher,
    Request,
    Response,
    Terminal,
    // Method routing
    Verb,
    VerbRouter,
    error_handler_fn,
    handler_fn,
};

pub use ladder_core::http;

/// Standard middleware.
pub mod middleware {
    #![allow(clippy::wildcard_imports)]
    pub use ladder_std::middleware::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use ladder_std::testing::*;
}

/// Tower integration.
#[cfg(feature = "tower")]
pub mod service {
    #![allow(clippy::wildcard_imports)]
    pub use ladder_std::service::*;
}

/// HTTP/1 server.
#[cfg(feature = "server")]
pub mod server {
    #![allow(clippy::wildcard_imports)]
    pub use ladder_std::server::*;
}

/// Prelude module - common imports for Ladder.
///
/// # Usage
///
/// ```rust
/// use ladder::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Dispatch
        App,
        // Errors
        BoxError,
        BoxFuture,
        DispatchError,
        // Core traits
        ErrorHandler,
        Handler,
        HandlerResult,
        Next,
        Request,
        Response,
        VerbRouter,
        error_handler_fn,
        handler_fn,
    };
}
