//! # ladder-core
//!
//! The dispatch engine of the Ladder middleware framework.
//!
//! This crate holds everything a request needs on its way through a stack of
//! handlers, and nothing else: no transport, no runtime. `ladder-std` adds
//! standard middleware and adapters on top.
//!
//! # Three Pieces
//!
//! ## Matching ([`PathMatcher`])
//!
//! Compiles `/literal/:param` patterns once and answers match / no match for
//! a request path, capturing named parameters.
//!
//! - **Prefix or terminal**: middleware match a path prefix at a segment
//!   boundary; routes must consume the whole path
//! - **Decoded**: paths are percent-decoded before comparison
//!
//! ## Traversal ([`App`], [`Next`])
//!
//! An ordered stack of path-matched handlers, walked in registration order.
//! Each handler decides whether to hand control on through its [`Next`].
//!
//! - **Two modes**: normal handlers run while no error is active, error
//!   handlers ([`ErrorHandler`]) run while one is
//! - **Composable**: apps mount inside apps, seeing paths relative to their
//!   mount point
//!
//! ## Method dispatch ([`VerbRouter`])
//!
//! A per-path list of method-filtered handlers, itself a [`Handler`].
//!
//! # Error Types
//!
//! - [`BoxError`] - The error channel between handlers
//! - [`DispatchError`] - Faults raised by the engine (panics, timeouts)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod app;
mod error;
mod handler;
mod next;
mod path;
mod request;
mod response;
mod terminal;
mod verb;

// Re-exports
pub use app::App;
pub use error::{BoxError, DispatchError, HandlerResult};
pub use handler::{
    ErrorHandler, ErrorHandlerFn, Handler, HandlerFn, Layer, LayerKind, error_handler_fn,
    handler_fn,
};
pub use next::Next;
pub use path::{MatchOptions, PathMatch, PathMatcher};
pub use request::{Params, Request};
pub use response::Response;
pub use terminal::{DefaultTerminal, Terminal};
pub use verb::{Verb, VerbRouter};

pub use futures::future::BoxFuture;
pub use http;
